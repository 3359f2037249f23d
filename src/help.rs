pub const HELP: &str = "\
Usage: jurl <url> [options...]
  -M, --method <method>            Request method, one of GET, PUT, DELETE, POST, PATCH (default GET)
  -H, --headers <k:v;k:v>          Pass custom header(s) to server
  -i, --include                    Include protocol response headers in the output
  -h, --help                       This help text
  -f                               Follow redirects
  -O, --output [output_file_name]  Write the response body to [output_file_name], or output_<timestamp> when not given
  -S, --save <group_name>          Save the request to the request repository under <group_name>
  -d, --data <k=v&k=v>             Form data, url encoded (multipart when Content-Type is multipart/form-data)
  -j, --json <json>                Send a json object or array as the message body
      --upload <file>              Upload a file as the raw message body
  Only one of -d, -j and --upload can be used in a single request.
Usage: jurl create <group_name>
  Create a saved request group named <group_name>
Usage: jurl list
  List all saved request groups
Usage: jurl list <group_name>
  List all saved requests of <group_name>
Usage: jurl fire <group_name> <request_num_1> [request_num_2...]
  Execute the saved requests of <group_name> with the given numbers one by one, in ascending order
Global options (before the command):
  --store <path>                   Saved requests file (env JURL_STORE, default saved-requests.json)
  --output-dir <dir>               Directory for -O files (env JURL_OUTPUT_DIR, default .)
  -v, --verbose                    Debug logging on stderr (env JURL_LOG overrides)
";

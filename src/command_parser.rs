use std::collections::{BTreeSet, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::{JurlError, Result};
use crate::http_request::{BodyType, HttpMethod, NameValues, OutputTarget, Request, RequestBody};
use crate::json_validator::is_valid_json;
use crate::request_body::MULTIPART_FORM_DATA;

static SCHEME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap());

/// What one invocation asks the engine to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateGroup(String),
    ListGroups,
    ListGroupRequests(String),
    /// Zero-based ordinals; duplicates collapse, iteration is ascending.
    Fire { group: String, ordinals: BTreeSet<usize> },
    Help,
    /// `save` is set by `-S`; the target group is `request.group`.
    Execute { request: Request, save: bool },
}

/// Values supplied by the caller next to the argument vector. A plain cli
/// invocation uses the default: no name, no query params, no body type.
#[derive(Debug, Clone, Default)]
pub struct ParseContext {
    pub request_name: String,
    pub query_params: NameValues,
    pub body_type: Option<BodyType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Flag {
    Method,
    Headers,
    Include,
    Redirect,
    Output,
    Save,
    Data,
    Json,
    Upload,
}

impl Flag {
    fn from_token(token: &str) -> Option<Flag> {
        let flag = match token {
            "-M" | "--method" => Flag::Method,
            "-H" | "--headers" => Flag::Headers,
            "-i" | "--include" => Flag::Include,
            "-f" => Flag::Redirect,
            "-O" | "--output" => Flag::Output,
            "-S" | "--save" => Flag::Save,
            "-d" | "--data" => Flag::Data,
            "-j" | "--json" => Flag::Json,
            "--upload" => Flag::Upload,
            _ => return None,
        };
        Some(flag)
    }

    fn is_body(&self) -> bool {
        matches!(self, Flag::Data | Flag::Json | Flag::Upload)
    }

    fn name(&self) -> &'static str {
        match self {
            Flag::Method => "method",
            Flag::Headers => "header",
            Flag::Include => "include",
            Flag::Redirect => "redirect",
            Flag::Output => "output",
            Flag::Save => "save",
            Flag::Data => "data",
            Flag::Json => "json",
            Flag::Upload => "upload",
        }
    }
}

pub fn parse_command<S: AsRef<str>>(context: &ParseContext, args: &[S]) -> Result<Command> {
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let Some((&first, rest)) = args.split_first() else {
        return Err(JurlError::parse("invalid command"));
    };

    let command = match first {
        "create" => match rest {
            [] => return Err(JurlError::parse("group name in create command not found")),
            [group] => Command::CreateGroup(group.to_string()),
            _ => return Err(JurlError::parse("invalid command format")),
        },
        "list" => match rest {
            [] => Command::ListGroups,
            [group] => Command::ListGroupRequests(group.to_string()),
            _ => return Err(JurlError::parse("invalid command format")),
        },
        "fire" => parse_fire(rest)?,
        "-h" | "--help" => Command::Help,
        destination => parse_request(context, destination, rest)?,
    };
    debug!(?command, "parsed command");
    Ok(command)
}

fn parse_fire(rest: &[&str]) -> Result<Command> {
    let Some((group, numbers)) = rest.split_first() else {
        return Err(JurlError::parse("group name in fire command not found"));
    };
    if numbers.is_empty() {
        return Err(JurlError::parse("saved requests to fire not found"));
    }
    let ordinals = numbers
        .iter()
        .map(|n| match n.parse::<usize>() {
            Ok(number) if number >= 1 => Ok(number - 1),
            _ => Err(JurlError::parse(format!("invalid saved request number {}", n))),
        })
        .collect::<Result<BTreeSet<usize>>>()?;
    Ok(Command::Fire {
        group: group.to_string(),
        ordinals,
    })
}

fn parse_request(context: &ParseContext, destination: &str, flags: &[&str]) -> Result<Command> {
    let url = if SCHEME_RE.is_match(destination) {
        destination.to_string()
    } else {
        format!("http://{}", destination)
    };

    let mut request = Request::new(&context.request_name, &url);
    request.query_params = context.query_params.clone();

    let mut seen: HashSet<Flag> = HashSet::new();
    let mut save = false;
    let mut data: Option<NameValues> = None;
    let mut tokens = flags.iter().copied().peekable();

    while let Some(token) = tokens.next() {
        let flag = Flag::from_token(token)
            .ok_or_else(|| JurlError::parse(format!("invalid parameter: {}", token)))?;
        if flag.is_body() && seen.iter().any(Flag::is_body) {
            return Err(JurlError::parse("must use only one of data, json, upload parameters"));
        }
        if !seen.insert(flag) {
            return Err(JurlError::parse(format!(
                "must use {} parameter at most once",
                flag.name()
            )));
        }

        match flag {
            Flag::Method => request.method = value(&mut tokens, flag)?.parse::<HttpMethod>()?,
            Flag::Headers => request.headers = split_pairs(value(&mut tokens, flag)?, ';', ':', "header")?,
            Flag::Include => request.show_response_headers = true,
            Flag::Redirect => request.follow_redirects = true,
            Flag::Output => {
                request.output = match tokens.next_if(|next| !next.starts_with('-')) {
                    Some(name) => OutputTarget::Named(name.to_string()),
                    None => OutputTarget::Generated,
                }
            }
            Flag::Save => {
                request.group = value(&mut tokens, flag)?.to_string();
                save = true;
            }
            Flag::Data => data = Some(split_pairs(value(&mut tokens, flag)?, '&', '=', "data")?),
            Flag::Json => {
                let json = value(&mut tokens, flag)?;
                if !is_valid_json(json) {
                    return Err(JurlError::parse(format!("json invalid format: {}", json)));
                }
                request.body = RequestBody::Json(json.to_string());
            }
            Flag::Upload => request.body = RequestBody::Binary(value(&mut tokens, flag)?.into()),
        }
    }

    // headers may follow -d on the command line, so the encoding is picked last
    if let Some(data) = data {
        request.body = if wants_multipart(context, &request) {
            RequestBody::FormData(data)
        } else {
            RequestBody::UrlEncoded(data)
        };
    }
    // reject headers the transport cannot carry before anything is saved
    request.header_map()?;

    Ok(Command::Execute { request, save })
}

fn value<'a>(tokens: &mut impl Iterator<Item = &'a str>, flag: Flag) -> Result<&'a str> {
    tokens
        .next()
        .ok_or_else(|| JurlError::parse(format!("{} parameter value not found", flag.name())))
}

fn wants_multipart(context: &ParseContext, request: &Request) -> bool {
    context.body_type == Some(BodyType::FormData)
        || request
            .header("Content-Type")
            .map_or(false, |ct| ct.trim_start().starts_with(MULTIPART_FORM_DATA))
}

/// Splits `k<kv>v<sep>k<kv>v...` into trimmed pairs. Empty segments are skipped.
fn split_pairs(text: &str, separator: char, key_value: char, what: &str) -> Result<NameValues> {
    let mut pairs = NameValues::new();
    for segment in text.split(separator).filter(|s| !s.trim().is_empty()) {
        let (key, value) = segment
            .split_once(key_value)
            .ok_or_else(|| JurlError::parse(format!("invalid {} entry: {}", what, segment)))?;
        pairs.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(pairs)
}

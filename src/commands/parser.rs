use crate::assets::DocumentKind;
use crate::entity::EntityId;

// Command enum to represent operator commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Resolve(EntityId),
    Reset(EntityId),
    Save(EntityId, Vec<Assignment>),
    SetDefaults(Vec<Assignment>),
    Import(EntityId, DocumentKind, String),
    ImportCover(EntityId, String),
    DeleteCover(EntityId),
    Grant(String),
    Readiness,
    Help,
    Unknown(String),
}

/// One `option=value` pair from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub option: String,
    pub value: String,
}

#[derive(Debug, PartialEq)]
pub enum CommandResult {
    Success,
    Failed,
}

/// Parsed command line
#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub config_path: Option<String>,
    pub command: Command,
}

pub const USAGE: &str = "usage: psx2-store [--config PATH] <command> [args]

<game> is a serial, serial:checksum, or :checksum

commands:
  resolve <game> [checksum]
  reset <game> [checksum]
  save <game> <option=value>...
  set-default <option=value>...
  import-cheats <game> <file>
  import-patches <game> <file>
  import-cover <game> <image>
  delete-cover <game>
  grant <dir>
  readiness

options: renderer, upscale, aspect, blending, widescreen,
         no-interlacing, patches, cheats";

// Split off the global --config flag, then parse the rest
pub fn parse_invocation(args: &[String]) -> Invocation {
    match args {
        [flag, path, rest @ ..] if flag == "--config" => Invocation {
            config_path: Some(path.clone()),
            command: parse_command(rest),
        },
        _ => Invocation {
            config_path: None,
            command: parse_command(args),
        },
    }
}

// `SLUS-20062`, `SLUS-20062:4C9EE7DF` or `:4C9EE7DF`
pub fn parse_entity(token: &str) -> EntityId {
    match token.split_once(':') {
        Some((serial, checksum)) => EntityId::new(serial, checksum),
        None => EntityId::serial(token),
    }
}

fn parse_assignments(words: &[&str]) -> Option<Vec<Assignment>> {
    if words.is_empty() {
        return None;
    }
    words
        .iter()
        .map(|word| {
            let (option, value) = word.split_once('=')?;
            (!option.is_empty() && !value.is_empty()).then(|| Assignment {
                option: option.to_ascii_lowercase(),
                value: value.to_string(),
            })
        })
        .collect()
}

// Parse command words into the Command enum
pub fn parse_command(args: &[String]) -> Command {
    let words: Vec<&str> = args.iter().map(String::as_str).collect();
    let cmd = words.first().map(|w| w.to_ascii_lowercase()).unwrap_or_default();
    let rest = &words[1.min(words.len())..];

    let parsed = match (cmd.as_str(), rest) {
        ("resolve", [game]) => Some(Command::Resolve(parse_entity(game))),
        ("resolve", [serial, checksum]) => Some(Command::Resolve(EntityId::new(*serial, *checksum))),
        ("reset", [game]) => Some(Command::Reset(parse_entity(game))),
        ("reset", [serial, checksum]) => Some(Command::Reset(EntityId::new(*serial, *checksum))),
        ("save", [game, pairs @ ..]) => {
            parse_assignments(pairs).map(|pairs| Command::Save(parse_entity(game), pairs))
        }
        ("set-default", pairs) => parse_assignments(pairs).map(Command::SetDefaults),
        ("import-cheats", [game, file]) => Some(Command::Import(
            parse_entity(game),
            DocumentKind::Cheats,
            file.to_string(),
        )),
        ("import-patches", [game, file]) => Some(Command::Import(
            parse_entity(game),
            DocumentKind::Patches,
            file.to_string(),
        )),
        ("import-cover", [game, image]) => {
            Some(Command::ImportCover(parse_entity(game), image.to_string()))
        }
        ("delete-cover", [game]) => Some(Command::DeleteCover(parse_entity(game))),
        ("grant", [dir]) => Some(Command::Grant(dir.to_string())),
        ("readiness", []) => Some(Command::Readiness),
        ("help" | "--help" | "-h", _) | ("", _) => Some(Command::Help),
        _ => None,
    };
    parsed.unwrap_or_else(|| Command::Unknown(words.join(" ")))
}

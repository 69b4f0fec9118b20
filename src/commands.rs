//! The `/private` chat command and the selection tool, as feedback text.
//!
//! The host parses what the player typed with [`PrivateCommand::parse`], runs it through
//! [`PrivateCommands::execute`] and shows the returned lines. Clicks with the selection tool
//! go to [`PrivateCommands::use_selection_tool`].
use std::sync::Arc;
use time::macros::format_description;
use time::OffsetDateTime;
use crate::errors::RegistryError;
use crate::zone::{Actor, BlockPos, Region, SelectionSlot, Zone, ZoneRegistry};

const ROOT: &str = "/private";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrivateCommand {
    /// Explains how to use the selection tool
    Wand,
    Create { name: String },
    List,
    /// Shows the actor's own id, which the web side needs
    Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Usage: /private <wand|create <name>|list|uuid>")]
    Usage,

    #[error("Unknown subcommand '{0}'")]
    UnknownSubcommand(String),

    #[error("Usage: /private create <name>")]
    MissingName,

    #[error("Unterminated quote in zone name")]
    UnterminatedQuote,
}

impl PrivateCommand {
    /// Parses a full command line. The leading slash is optional.
    ///
    /// The zone name is a single word or a double-quoted string that may contain spaces.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let rest = line
            .strip_prefix(ROOT)
            .or_else(|| line.strip_prefix(&ROOT[1..]))
            .ok_or(CommandError::Usage)?;
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            return Err(CommandError::Usage);
        }

        let rest = rest.trim_start();
        let (sub, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match sub {
            "" => Err(CommandError::Usage),
            "wand" => Ok(PrivateCommand::Wand),
            "list" => Ok(PrivateCommand::List),
            "uuid" => Ok(PrivateCommand::Uuid),
            "create" => parse_name(args.trim()).map(|name| PrivateCommand::Create { name }),
            other => Err(CommandError::UnknownSubcommand(other.to_string())),
        }
    }
}

fn parse_name(args: &str) -> Result<String, CommandError> {
    if let Some(quoted) = args.strip_prefix('"') {
        let end = quoted.find('"').ok_or(CommandError::UnterminatedQuote)?;
        return Ok(quoted[..end].to_string());
    }

    match args.split_whitespace().next() {
        Some(word) => Ok(word.to_string()),
        None => Err(CommandError::MissingName),
    }
}

/// Executes `/private` commands against a registry.
#[derive(Clone)]
pub struct PrivateCommands {
    registry: Arc<ZoneRegistry>,
}

impl PrivateCommands {
    pub fn new(registry: Arc<ZoneRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self, actor: &Actor, world: &str, command: &PrivateCommand) -> Vec<String> {
        match command {
            PrivateCommand::Wand => vec![
                "Use the selection tool to mark your zone.".to_string(),
                "Right click - first point".to_string(),
                "Sneak + right click - second point".to_string(),
            ],
            PrivateCommand::Create { name } => self.create(actor, world, name).await,
            PrivateCommand::List => self.list(actor),
            PrivateCommand::Uuid => vec![format!("Name: {}", actor.name), format!("UUID: {}", actor.id)],
        }
    }

    /// Records the clicked block as a selection corner. Sneaking picks the second corner.
    pub fn use_selection_tool(&self, actor: &Actor, pos: BlockPos, sneaking: bool) -> Vec<String> {
        let (slot, label) = if sneaking {
            (SelectionSlot::Second, "Second")
        } else {
            (SelectionSlot::First, "First")
        };
        self.registry.set_point(&actor.id, slot, pos);

        let mut lines = vec![format!("{} point set: {}", label, pos)];
        if let Some(region) = self.registry.selection(&actor.id).and_then(|s| s.region()) {
            lines.push(format!("Area selected! Size: {}", describe_size(&region)));
        }
        lines
    }

    async fn create(&self, actor: &Actor, world: &str, name: &str) -> Vec<String> {
        match self.registry.create_zone(name, actor, world).await {
            Ok(zone) => vec![
                format!("Private zone '{}' created successfully!", zone.name),
                format!("Size: {}", describe_size(&zone.region)),
            ],
            Err(RegistryError::NoSelection) => {
                vec!["You need to select two points first! Use /private wand to get started.".to_string()]
            }
            Err(e) => vec![format!("Failed to create private zone: {}", e)],
        }
    }

    fn list(&self, actor: &Actor) -> Vec<String> {
        let zones = self.registry.zones_owned_by(&actor.id);
        if zones.is_empty() {
            return vec![
                "You don't have any private zones.".to_string(),
                "Use /private wand and /private create <name> to create your first zone!".to_string(),
            ];
        }

        let mut lines = vec![format!("=== Your Private Zones ({}) ===", zones.len())];
        for (i, zone) in zones.iter().enumerate() {
            lines.extend(describe_zone(i + 1, zone));
        }
        lines
    }
}

fn describe_size(region: &Region) -> String {
    let (x, y, z) = region.extents();
    format!("{}x{}x{} ({} blocks)", x, y, z, region.volume())
}

fn describe_zone(index: usize, zone: &Zone) -> Vec<String> {
    vec![
        format!("{}. {}", index, zone.name),
        format!("   Size: {}", describe_size(&zone.region)),
        format!("   World: {}", zone.world.replace("minecraft:", "")),
        format!("   Position: {} to {}", zone.region.min(), zone.region.max()),
        format!("   Created: {}", format_created(zone.created_at)),
    ]
}

/// `dd.MM.yyyy HH:mm` in UTC.
fn format_created(millis: i64) -> String {
    let format = format_description!("[day].[month].[year] [hour]:[minute]");
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
        .ok()
        .and_then(|t| t.format(&format).ok())
        .unwrap_or_else(|| "unknown".to_string())
}

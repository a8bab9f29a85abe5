//! Core data types shared by the scanner, tree model and reload coordinator.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Separator between an owning file path and a section key in encoded ids.
pub const SECTION_SEPARATOR: char = '#';

/// Precedence tier of a configuration source. The derived order is the
/// display order and the merge order (later wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Managed,
    User,
    Project,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Managed, Scope::User, Scope::Project];

    pub fn label(self) -> &'static str {
        match self {
            Scope::Managed => "Managed",
            Scope::User => "User",
            Scope::Project => "Project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Json,
    Jsonc,
    Markdown,
}

impl FileFormat {
    /// Classify by extension. Anything unrecognised is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
        match ext.as_str() {
            "md" => FileFormat::Markdown,
            "jsonc" => FileFormat::Jsonc,
            _ => FileFormat::Json,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Jsonc => "JSONC",
            FileFormat::Markdown => "Markdown",
        }
    }
}

/// Functional category of a configuration artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Settings,
    Instructions,
    Mcp,
    Policy,
    Commands,
    Skills,
    Agents,
    Keybindings,
    Hooks,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::Settings => "Settings",
            Category::Instructions => "Instructions",
            Category::Mcp => "MCP",
            Category::Policy => "Policy",
            Category::Commands => "Commands",
            Category::Skills => "Skills",
            Category::Agents => "Agents",
            Category::Keybindings => "Keybindings",
            Category::Hooks => "Hooks",
        }
    }

    /// Categories whose files may embed hook and MCP server sections.
    pub fn has_sections(self) -> bool {
        matches!(self, Category::Settings | Category::Mcp)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Location of a section inside a JSON document: a top-level group key and,
/// for leaf items, the item name inside that group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SectionKey {
    pub group: String,
    pub item: Option<String>,
}

impl SectionKey {
    pub fn group(group: impl Into<String>) -> Self {
        Self { group: group.into(), item: None }
    }

    pub fn item(group: impl Into<String>, item: impl Into<String>) -> Self {
        Self { group: group.into(), item: Some(item.into()) }
    }

    /// Parse a dotted key. Only the first `.` separates group from item, so
    /// item names may themselves contain dots.
    pub fn parse(dotted: &str) -> Self {
        match dotted.split_once('.') {
            Some((group, item)) => Self::item(group, item),
            None => Self::group(dotted),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.item {
            Some(item) => write!(f, "{}.{}", self.group, item),
            None => f.write_str(&self.group),
        }
    }
}

/// Identity of an artifact. Real artifacts are filesystem paths; virtual ones
/// are sections of a real JSON file and never exist on disk by themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactId {
    Real { path: PathBuf },
    Virtual { owner: PathBuf, section: SectionKey },
}

impl ArtifactId {
    pub fn real(path: impl Into<PathBuf>) -> Self {
        ArtifactId::Real { path: path.into() }
    }

    pub fn section(owner: impl Into<PathBuf>, section: SectionKey) -> Self {
        ArtifactId::Virtual { owner: owner.into(), section }
    }

    /// Decode the textual form produced by [`ArtifactId::key`], splitting on
    /// the first `#`.
    pub fn parse_key(key: &str) -> Self {
        match key.split_once(SECTION_SEPARATOR) {
            Some((owner, section)) => Self::section(owner, SectionKey::parse(section)),
            None => Self::real(key),
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, ArtifactId::Virtual { .. })
    }

    /// The real file backing this artifact: itself, or the owning file.
    pub fn owner_path(&self) -> &Path {
        match self {
            ArtifactId::Real { path } => path,
            ArtifactId::Virtual { owner, .. } => owner,
        }
    }

    /// Encoded form: `<path>` or `<owner>#<group>[.<item>]`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactId::Real { path } => write!(f, "{}", path.display()),
            ArtifactId::Virtual { owner, section } => {
                write!(f, "{}{}{}", owner.display(), SECTION_SEPARATOR, section)
            }
        }
    }
}

/// A scanned configuration entity: a real file or directory, or a section
/// synthesized from a JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub id: ArtifactId,
    pub scope: Scope,
    pub format: FileFormat,
    pub category: Category,
    pub exists: bool,
    pub is_dir: bool,
    pub size: Option<u64>,
    #[serde(serialize_with = "serialize_modified")]
    pub modified: Option<SystemTime>,
    pub label: String,
    pub children: Vec<Artifact>,
}

impl Artifact {
    pub fn is_virtual(&self) -> bool {
        self.id.is_virtual()
    }

    pub fn path(&self) -> &Path {
        self.id.owner_path()
    }

    pub fn key(&self) -> String {
        self.id.key()
    }

    /// Copy of this artifact without its children.
    pub fn shallow(&self) -> Artifact {
        Artifact {
            id: self.id.clone(),
            scope: self.scope,
            format: self.format,
            category: self.category,
            exists: self.exists,
            is_dir: self.is_dir,
            size: self.size,
            modified: self.modified,
            label: self.label.clone(),
            children: Vec::new(),
        }
    }
}

fn serialize_modified<S: Serializer>(
    modified: &Option<SystemTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match modified {
        Some(time) => DateTime::<Utc>::from(*time).to_rfc3339().serialize(serializer),
        None => serializer.serialize_none(),
    }
}

/// Output of one scan: artifacts per scope plus the detected project root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub managed: Vec<Artifact>,
    pub user: Vec<Artifact>,
    pub project: Vec<Artifact>,
    pub project_root: Option<PathBuf>,
}

impl ScanResult {
    pub fn scope(&self, scope: Scope) -> &[Artifact] {
        match scope {
            Scope::Managed => &self.managed,
            Scope::User => &self.user,
            Scope::Project => &self.project,
        }
    }

    pub fn scope_mut(&mut self, scope: Scope) -> &mut Vec<Artifact> {
        match scope {
            Scope::Managed => &mut self.managed,
            Scope::User => &mut self.user,
            Scope::Project => &mut self.project,
        }
    }

    /// Scopes in display order, including empty ones.
    pub fn scopes(&self) -> impl Iterator<Item = (Scope, &[Artifact])> {
        Scope::ALL.into_iter().map(move |scope| (scope, self.scope(scope)))
    }

    /// Top-level artifacts of every scope in display order.
    pub fn all(&self) -> impl Iterator<Item = &Artifact> {
        self.managed.iter().chain(self.user.iter()).chain(self.project.iter())
    }

    /// `(existing, total)` over top-level artifacts and their direct real
    /// children. Synthesized sections are not files and are not counted.
    pub fn file_stats(&self) -> (usize, usize) {
        let mut exist = 0;
        let mut total = 0;
        for artifact in self.all() {
            total += 1;
            if artifact.exists {
                exist += 1;
            }
            for child in artifact.children.iter().filter(|c| !c.is_virtual()) {
                total += 1;
                if child.exists {
                    exist += 1;
                }
            }
        }
        (exist, total)
    }
}

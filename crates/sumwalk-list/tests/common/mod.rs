//! Deterministic in-memory filesystem with Windows path semantics.
//!
//! Models exactly what the engine consumes: lexical full-path
//! resolution, long-name expansion with canonical casing and 8.3
//! aliases, enumeration with injectable failures. Paths use `\` and
//! drive roots like `C:`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::{Cursor, Read};

use sumwalk_list::{DirListing, Filesystem, long_compatible};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Dir,
    File,
}

pub struct MemFs {
    cwd: String,
    /// Canonical path (no trailing separator) to node kind. Drive
    /// roots are stored as `C:`.
    nodes: BTreeMap<String, NodeKind>,
    contents: HashMap<String, Vec<u8>>,
    /// (lowercase parent, lowercase 8.3 alias) to canonical child name.
    aliases: HashMap<(String, String), String>,
    fail_all: HashSet<String>,
    fail_after: HashMap<String, usize>,
}

impl MemFs {
    /// New filesystem with the given working directory (registered as
    /// an existing directory chain).
    pub fn new(cwd: &str) -> Self {
        let mut fs = Self {
            cwd: cwd.to_owned(),
            nodes: BTreeMap::new(),
            contents: HashMap::new(),
            aliases: HashMap::new(),
            fail_all: HashSet::new(),
            fail_after: HashMap::new(),
        };
        fs.add_dir_chain(cwd);
        fs
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.add_dir_chain(path);
        self
    }

    pub fn file(mut self, path: &str, content: &[u8]) -> Self {
        let parent_end = path.rfind('\\').expect("file path needs a parent");
        self.add_dir_chain(&path[..parent_end]);
        self.nodes.insert(path.to_owned(), NodeKind::File);
        self.contents.insert(path.to_owned(), content.to_vec());
        self
    }

    /// Register an 8.3 alias for a child of `parent`.
    pub fn short_alias(mut self, parent: &str, alias: &str, long_name: &str) -> Self {
        self.aliases.insert(
            (parent.to_lowercase(), alias.to_lowercase()),
            long_name.to_owned(),
        );
        self
    }

    /// Make enumeration of `path` fail before yielding anything.
    pub fn fail_enumeration(mut self, path: &str) -> Self {
        self.fail_all.insert(path.to_owned());
        self
    }

    /// Make enumeration of `path` die after yielding `keep` children.
    pub fn fail_enumeration_after(mut self, path: &str, keep: usize) -> Self {
        self.fail_after.insert(path.to_owned(), keep);
        self
    }

    fn add_dir_chain(&mut self, path: &str) {
        let mut end = 0;
        loop {
            match path[end..].find('\\') {
                Some(offset) => {
                    end += offset;
                    self.nodes.insert(path[..end].to_owned(), NodeKind::Dir);
                    end += 1;
                }
                None => {
                    self.nodes.insert(path.to_owned(), NodeKind::Dir);
                    break;
                }
            }
        }
    }

    fn children(&self, parent: &str) -> Vec<String> {
        let prefix = format!("{parent}\\");
        self.nodes
            .keys()
            .filter(|key| key.starts_with(&prefix) && !key[prefix.len()..].contains('\\'))
            .map(|key| key[prefix.len()..].to_owned())
            .collect()
    }

    /// Resolve a path to its canonical form: exact-case match first,
    /// then case-insensitive, then the 8.3 alias table, component by
    /// component. `None` when any component does not exist.
    fn lookup(&self, path: &str) -> Option<String> {
        let mut parts = path.split('\\');
        let drive = parts.next()?;
        let mut canonical = self
            .nodes
            .keys()
            .find(|key| !key.contains('\\') && key.eq_ignore_ascii_case(drive))?
            .clone();

        for component in parts {
            let exact = format!("{canonical}\\{component}");
            if self.nodes.contains_key(&exact) {
                canonical = exact;
                continue;
            }
            let folded = component.to_lowercase();
            if let Some(name) = self
                .children(&canonical)
                .into_iter()
                .find(|name| name.to_lowercase() == folded)
            {
                canonical = format!("{canonical}\\{name}");
                continue;
            }
            let name = self
                .aliases
                .get(&(canonical.to_lowercase(), folded))?
                .clone();
            let candidate = format!("{canonical}\\{name}");
            if !self.nodes.contains_key(&candidate) {
                return None;
            }
            canonical = candidate;
        }
        Some(canonical)
    }

    fn strip_decorations(path: &str) -> (bool, bool, &str) {
        let (prefixed, rest) = match path.strip_prefix(r"\\?\") {
            Some(rest) => (true, rest),
            None => (false, path),
        };
        let trimmed = rest.trim_end_matches('\\');
        (prefixed, trimmed.len() != rest.len(), trimmed)
    }

    /// Canonical node for any path form (relative forms resolve against
    /// the working directory, as the Win32 file APIs do).
    fn canonical_of(&self, path: &str) -> Option<String> {
        let full = self.resolve_full(path)?;
        let (_, _, core) = Self::strip_decorations(&full);
        if core.is_empty() {
            return None;
        }
        self.lookup(core)
    }
}

impl Filesystem for MemFs {
    fn separator(&self) -> char {
        '\\'
    }

    fn long_compatible(&self, path: String) -> String {
        long_compatible(path)
    }

    fn resolve_full(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        if path.starts_with(r"\\?\") {
            return Some(path.to_owned());
        }
        let path = path.replace('/', "\\");

        let absolute = if path.len() >= 2 && path.as_bytes()[1] == b':' {
            let (drive, rest) = path.split_at(2);
            if rest.starts_with('\\') {
                path.clone()
            } else if self.cwd[..2].eq_ignore_ascii_case(drive) {
                // drive-relative against the working directory
                format!("{}\\{rest}", self.cwd)
            } else {
                format!("{drive}\\{rest}")
            }
        } else if path.starts_with('\\') {
            format!("{}{path}", &self.cwd[..2])
        } else {
            format!("{}\\{path}", self.cwd)
        };

        let trailing = absolute.ends_with('\\');
        let drive = &absolute[..2];
        let mut components: Vec<&str> = Vec::new();
        for component in absolute[2..].split('\\') {
            match component {
                "" | "." => {}
                ".." => {
                    components.pop();
                }
                other => components.push(other),
            }
        }

        let mut out = drive.to_owned();
        for component in &components {
            out.push('\\');
            out.push_str(component);
        }
        if components.is_empty() || trailing {
            out.push('\\');
        }
        Some(out)
    }

    fn expand_long(&self, path: &str) -> Option<String> {
        if path.is_empty() {
            return None;
        }
        let (prefixed, trailing, core) = Self::strip_decorations(path);
        if core.is_empty() {
            return None;
        }
        let mut out = self.lookup(core)?;
        if trailing {
            out.push('\\');
        }
        if prefixed {
            out = format!(r"\\?\{out}");
        }
        Some(out)
    }

    fn is_dir(&self, path: &str) -> bool {
        self.canonical_of(path)
            .is_some_and(|canonical| self.nodes.get(&canonical) == Some(&NodeKind::Dir))
    }

    fn read_dir(&self, path: &str) -> DirListing {
        let Some(canonical) = self.canonical_of(path) else {
            return DirListing::failed();
        };
        if self.fail_all.contains(&canonical) {
            return DirListing::failed();
        }

        // FindFirstFileW with long paths reports the pseudo-entries too.
        let mut entries = vec![".".to_owned(), "..".to_owned()];
        let children = self.children(&canonical);
        if let Some(&keep) = self.fail_after.get(&canonical) {
            entries.extend(children.into_iter().take(keep));
            return DirListing {
                entries,
                complete: false,
            };
        }
        entries.extend(children);
        DirListing {
            entries,
            complete: true,
        }
    }

    fn open(&self, path: &str) -> std::io::Result<Box<dyn Read>> {
        match self.canonical_of(path) {
            Some(canonical) => match self.contents.get(&canonical) {
                Some(content) => Ok(Box::new(Cursor::new(content.clone()))),
                None => Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied)),
            },
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound)),
        }
    }
}

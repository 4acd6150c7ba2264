use std::collections::HashMap;
use std::sync::LazyLock;

use configparser::ini::Ini;
use regex::Regex;
use rustc_hash::FxHashMap;

/// A single entry point: a name mapped to an object reference like `foo.bar:Checker`.
///
/// <https://packaging.python.org/en/latest/specifications/entry-points/>
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryPoint {
    /// The entry name within its group. For flake8 extensions, this is the code prefix the
    /// plugin registers (e.g. `B`, `SIM`).
    pub name: String,
    /// The dotted module path of the referenced object.
    pub module: String,
    /// The object within the module, if one is referenced.
    pub object: Option<String>,
}

impl EntryPoint {
    /// Parses an object reference like `foo.bar:Checker`, `foomod:main_bar [bar,baz]`, or a
    /// bare module path.
    fn from_value(name: &str, value: &str) -> Result<Self, String> {
        // "Within a value, readers must accept and ignore spaces (including multiple consecutive
        //  spaces) before or after the colon, between the object reference and the left square
        //  bracket, between the extra names and the square brackets and colons delimiting them,
        //  and after the right square bracket."
        // – https://packaging.python.org/en/latest/specifications/entry-points/#file-format
        static REFERENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(
                r"^(?P<module>[\w\d_\-.]+)\s*(?::\s*(?P<object>[\w\d_\-.]+))?(?:\s*\[\s*(?:[^,\]]+,?\s*)*\])?\s*$",
            )
            .unwrap()
        });

        let captures = REFERENCE_REGEX
            .captures(value)
            .ok_or_else(|| format!("invalid object reference for `{name}`: '{value}'"))?;

        Ok(Self {
            name: name.to_string(),
            module: captures.name("module").unwrap().as_str().to_string(),
            object: captures
                .name("object")
                .map(|object| object.as_str().to_string()),
        })
    }
}

/// The parsed contents of a distribution's `entry_points.txt`, grouped by section.
#[derive(Clone, Debug, Default)]
pub struct EntryPoints(FxHashMap<String, Vec<EntryPoint>>);

impl EntryPoints {
    /// Parse an `entry_points.txt` file.
    ///
    /// Sections are read case-sensitively, matching the behavior of Python's
    /// `importlib.metadata`.
    pub(crate) fn parse(content: &str) -> Result<Self, String> {
        let mapping = Ini::new_cs().read(content.to_string())?;

        let mut groups = FxHashMap::default();
        for (group, section) in mapping {
            groups.insert(group.clone(), read_group(&group, &section)?);
        }
        Ok(Self(groups))
    }

    /// Returns the entries of the given group, sorted by entry name.
    pub fn group(&self, name: &str) -> &[EntryPoint] {
        self.0.get(name).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the given group exists and is non-empty.
    pub fn has_group(&self, name: &str) -> bool {
        !self.group(name).is_empty()
    }
}

fn read_group(
    group: &str,
    section: &HashMap<String, Option<String>>,
) -> Result<Vec<EntryPoint>, String> {
    let mut entries = Vec::with_capacity(section.len());
    for (name, value) in section {
        match value {
            Some(value) => entries.push(EntryPoint::from_value(name, value)?),
            None => {
                return Err(format!("[{group}] key {name} must have a value"));
            }
        }
    }
    // `configparser` hands back an unordered map; keep the group deterministic.
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

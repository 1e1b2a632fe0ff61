//! Poetic form catalogue.
//!
//! | Form | Lines | Syllables/line | Rhyme scheme | Meter |
//! |---|---|---|---|---|
//! | `haiku` | 3 | 5,7,5 | none | none |
//! | `limerick` | 5 | 8,8,5,5,8 | AABBA | anapestic |
//! | `shakespearean` | 14 | 10 each | ABABCDCDEFEFGG | iambic pentameter |
//! | `blank_verse` | 14 | 10 each | none | iambic pentameter |
//! | `free_verse` | variable | none | none | none |
//!
//! Built-in forms are immutable. Custom forms can be added to a registry
//! through [`FormSpecBuilder`] or loaded from JSON.

use std::collections::HashMap;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ProsodyError;
use crate::meter::{Foot, MeterTemplate};

/// Required number of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineCount {
    Fixed(usize),
    Variable,
}

/// Declarative constraints of one poetic form.
///
/// When present, `syllables` and `rhyme_scheme` hold exactly one entry per
/// line, which requires a fixed line count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct FormSpec {
    /// Lookup key, e.g. `"blank_verse"`.
    #[builder(setter(into))]
    pub key: String,
    /// Display name, e.g. `"Blank Verse"`.
    #[builder(setter(into))]
    pub name: String,
    #[builder(setter(into), default)]
    #[serde(default)]
    pub description: String,
    pub lines: LineCount,
    /// Target syllables per line.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    pub syllables: Option<Vec<usize>>,
    /// Rhyme label per line; equal labels must rhyme.
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    pub rhyme_scheme: Option<Vec<char>>,
    #[builder(setter(strip_option), default)]
    #[serde(default)]
    pub meter: Option<MeterTemplate>,
}

impl FormSpecBuilder {
    fn validate(&self) -> Result<(), String> {
        let Some(lines) = self.lines else {
            // reported as an uninitialized field by build()
            return Ok(());
        };
        check_shape(
            lines,
            self.syllables.as_ref().and_then(|s| s.as_deref()),
            self.rhyme_scheme.as_ref().and_then(|s| s.as_deref()),
            self.meter.flatten(),
        )
    }
}

impl From<FormSpecBuilderError> for ProsodyError {
    fn from(err: FormSpecBuilderError) -> Self {
        ProsodyError::InvalidForm(err.to_string())
    }
}

fn check_shape(
    lines: LineCount,
    syllables: Option<&[usize]>,
    rhyme_scheme: Option<&[char]>,
    meter: Option<MeterTemplate>,
) -> Result<(), String> {
    let fixed = match lines {
        LineCount::Fixed(0) => return Err("a form needs at least one line".to_string()),
        LineCount::Fixed(n) => Some(n),
        LineCount::Variable => None,
    };

    if let Some(targets) = syllables {
        match fixed {
            Some(n) if targets.len() == n => {}
            Some(n) => {
                return Err(format!(
                    "{} syllable targets for {n} lines",
                    targets.len()
                ))
            }
            None => return Err("syllable targets need a fixed line count".to_string()),
        }
    }

    if let Some(scheme) = rhyme_scheme {
        match fixed {
            Some(n) if scheme.len() == n => {}
            Some(n) => {
                return Err(format!(
                    "rhyme scheme has {} labels for {n} lines",
                    scheme.len()
                ))
            }
            None => return Err("a rhyme scheme needs a fixed line count".to_string()),
        }
    }

    if let Some(template) = meter {
        template.validate()?;
    }

    Ok(())
}

impl FormSpec {
    /// Check the per-line list invariants.
    pub fn validate(&self) -> Result<(), ProsodyError> {
        check_shape(
            self.lines,
            self.syllables.as_deref(),
            self.rhyme_scheme.as_deref(),
            self.meter,
        )
        .map_err(|reason| ProsodyError::InvalidForm(format!("{}: {reason}", self.key)))
    }

    /// Fixed line count, if any.
    pub fn line_count(&self) -> Option<usize> {
        match self.lines {
            LineCount::Fixed(n) => Some(n),
            LineCount::Variable => None,
        }
    }

    /// Target syllables for line `index`, if the form sets one.
    pub fn syllable_target(&self, index: usize) -> Option<usize> {
        self.syllables.as_ref()?.get(index).copied()
    }

    /// Rhyme label for line `index`, if the form has a scheme.
    pub fn rhyme_label(&self, index: usize) -> Option<char> {
        self.rhyme_scheme.as_ref()?.get(index).copied()
    }
}

/// Turn `"ABAB CDCD"` into `['A', 'B', 'A', 'B', 'C', 'D', 'C', 'D']`.
pub fn parse_scheme(scheme: &str) -> Vec<char> {
    scheme
        .chars()
        .filter(|c| c.is_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// `"Blank Verse"` and `"blank-verse"` both become `"blank_verse"`.
pub fn normalize_form_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Lookup table of forms. Built-ins come first and cannot be replaced.
#[derive(Debug, Clone)]
pub struct FormRegistry {
    forms: Vec<FormSpec>,
    index: HashMap<String, usize>,
    builtin_count: usize,
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormRegistry {
    /// Registry holding the five built-in forms.
    pub fn builtin() -> Self {
        let forms = builtin_forms();
        let builtin_count = forms.len();
        let mut registry = Self {
            forms: Vec::with_capacity(builtin_count),
            index: HashMap::new(),
            builtin_count,
        };
        for form in forms {
            registry.insert(form);
        }
        registry
    }

    /// Look up a form by key or display name, case-insensitively.
    pub fn get(&self, name: &str) -> Result<&FormSpec, ProsodyError> {
        self.index
            .get(&normalize_form_name(name))
            .map(|&idx| &self.forms[idx])
            .ok_or_else(|| ProsodyError::UnknownForm {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&normalize_form_name(name))
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.index
            .get(&normalize_form_name(name))
            .is_some_and(|&idx| idx < self.builtin_count)
    }

    /// Form keys in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.forms.iter().map(|f| f.key.as_str()).collect()
    }

    pub fn forms(&self) -> &[FormSpec] {
        &self.forms
    }

    /// Add a custom form, replacing an earlier custom form of the same key.
    pub fn register(&mut self, mut spec: FormSpec) -> Result<(), ProsodyError> {
        spec.key = normalize_form_name(&spec.key);
        if spec.key.is_empty() {
            return Err(ProsodyError::InvalidForm("empty form key".to_string()));
        }
        spec.validate()?;
        for alias in [spec.key.clone(), normalize_form_name(&spec.name)] {
            if self.is_builtin(&alias) {
                return Err(ProsodyError::BuiltinForm(alias));
            }
        }

        let replacing = match self.index.get(&spec.key) {
            Some(&idx) if self.forms[idx].key == spec.key => Some(idx),
            Some(&idx) => {
                // the key was only another form's display-name alias
                log::debug!(
                    "Form key '{}' takes over the display name of '{}'",
                    spec.key,
                    self.forms[idx].key
                );
                self.index.remove(&spec.key);
                None
            }
            None => None,
        };

        if let Some(idx) = replacing {
            log::info!("Replacing custom form '{}'", spec.key);
            let old_name = normalize_form_name(&self.forms[idx].name);
            if self.index.get(&old_name) == Some(&idx) {
                self.index.remove(&old_name);
            }
            let display = normalize_form_name(&spec.name);
            self.forms[idx] = spec;
            self.index.entry(display).or_insert(idx);
            return Ok(());
        }

        log::debug!("Registering form '{}'", spec.key);
        self.insert(spec);
        Ok(())
    }

    /// Register every form in a JSON array string. Returns how many were added.
    pub fn register_json(&mut self, json: &str) -> Result<usize, ProsodyError> {
        let specs: Vec<FormSpec> = serde_json::from_str(json)?;
        let count = specs.len();
        for spec in specs {
            self.register(spec)?;
        }
        Ok(count)
    }

    /// Register every form in a JSON file holding an array of forms.
    pub fn load_json(&mut self, path: &Path) -> Result<usize, ProsodyError> {
        let content = std::fs::read_to_string(path)?;
        let count = self.register_json(&content)?;
        log::info!("Loaded {count} forms from {}", path.display());
        Ok(count)
    }

    fn insert(&mut self, spec: FormSpec) {
        let idx = self.forms.len();
        self.index.insert(spec.key.clone(), idx);
        self.index.entry(normalize_form_name(&spec.name)).or_insert(idx);
        self.forms.push(spec);
    }
}

fn builtin_forms() -> Vec<FormSpec> {
    vec![
        FormSpec {
            key: "haiku".to_string(),
            name: "Haiku".to_string(),
            description: "Japanese 5-7-5 syllable poem".to_string(),
            lines: LineCount::Fixed(3),
            syllables: Some(vec![5, 7, 5]),
            rhyme_scheme: None,
            meter: None,
        },
        FormSpec {
            key: "limerick".to_string(),
            name: "Limerick".to_string(),
            description: "Humorous 5-line poem with AABBA rhyme".to_string(),
            lines: LineCount::Fixed(5),
            syllables: Some(vec![8, 8, 5, 5, 8]),
            rhyme_scheme: Some(parse_scheme("AABBA")),
            meter: Some(MeterTemplate::new(Foot::Anapestic, None)),
        },
        FormSpec {
            key: "shakespearean".to_string(),
            name: "Shakespearean Sonnet".to_string(),
            description: "14-line sonnet with three quatrains and a couplet".to_string(),
            lines: LineCount::Fixed(14),
            syllables: Some(vec![10; 14]),
            rhyme_scheme: Some(parse_scheme("ABAB CDCD EFEF GG")),
            meter: Some(MeterTemplate::iambic_pentameter()),
        },
        FormSpec {
            key: "blank_verse".to_string(),
            name: "Blank Verse".to_string(),
            description: "Unrhymed iambic pentameter".to_string(),
            lines: LineCount::Fixed(14),
            syllables: Some(vec![10; 14]),
            rhyme_scheme: None,
            meter: Some(MeterTemplate::iambic_pentameter()),
        },
        FormSpec {
            key: "free_verse".to_string(),
            name: "Free Verse".to_string(),
            description: "No fixed constraints on meter or rhyme".to_string(),
            lines: LineCount::Variable,
            syllables: None,
            rhyme_scheme: None,
            meter: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_form_name, parse_scheme, FormRegistry, FormSpec, FormSpecBuilder, LineCount,
    };
    use crate::error::ProsodyError;
    use crate::meter::{Foot, MeterTemplate};

    #[test]
    fn builtin_catalogue_matches_table() {
        let registry = FormRegistry::builtin();
        assert_eq!(
            registry.names(),
            ["haiku", "limerick", "shakespearean", "blank_verse", "free_verse"]
        );

        let haiku = registry.get("haiku").unwrap();
        assert_eq!(haiku.lines, LineCount::Fixed(3));
        assert_eq!(haiku.syllables.as_deref(), Some(&[5, 7, 5][..]));
        assert!(haiku.rhyme_scheme.is_none() && haiku.meter.is_none());

        let limerick = registry.get("limerick").unwrap();
        assert_eq!(limerick.rhyme_scheme, Some(parse_scheme("AABBA")));
        assert_eq!(limerick.meter.unwrap().foot, Foot::Anapestic);

        let sonnet = registry.get("shakespearean").unwrap();
        assert_eq!(sonnet.rhyme_scheme.as_ref().unwrap().len(), 14);
        assert_eq!(sonnet.syllable_target(13), Some(10));
        assert_eq!(sonnet.rhyme_label(12), Some('G'));
        assert_eq!(sonnet.meter, Some(MeterTemplate::iambic_pentameter()));

        let blank = registry.get("blank_verse").unwrap();
        assert!(blank.rhyme_scheme.is_none());

        let free = registry.get("free_verse").unwrap();
        assert_eq!(free.lines, LineCount::Variable);
        assert_eq!(free.syllable_target(0), None);

        for form in registry.forms() {
            form.validate().unwrap();
        }
    }

    #[test]
    fn unknown_form_lists_alternatives() {
        let registry = FormRegistry::builtin();
        match registry.get("villanelle") {
            Err(ProsodyError::UnknownForm { name, available }) => {
                assert_eq!(name, "villanelle");
                assert!(available.contains("haiku"));
            }
            other => panic!("expected UnknownForm, got {other:?}"),
        }
    }

    #[test]
    fn lookup_is_forgiving_about_spelling() {
        let registry = FormRegistry::builtin();
        assert_eq!(registry.get("Blank Verse").unwrap().key, "blank_verse");
        assert_eq!(registry.get("free-verse").unwrap().key, "free_verse");
        assert_eq!(registry.get("Shakespearean Sonnet").unwrap().key, "shakespearean");
        assert_eq!(normalize_form_name("  Terza-Rima "), "terza_rima");
    }

    #[test]
    fn registers_custom_forms() {
        let mut registry = FormRegistry::builtin();
        let quatrain = FormSpecBuilder::default()
            .key("Heroic Quatrain")
            .name("Heroic Quatrain")
            .lines(LineCount::Fixed(4))
            .syllables(vec![10; 4])
            .rhyme_scheme(parse_scheme("ABAB"))
            .meter(MeterTemplate::iambic_pentameter())
            .build()
            .unwrap();
        registry.register(quatrain).unwrap();

        assert!(registry.contains("heroic_quatrain"));
        assert!(!registry.is_builtin("heroic_quatrain"));
        assert_eq!(registry.names().last(), Some(&"heroic_quatrain"));
    }

    #[test]
    fn builtins_are_immutable() {
        let mut registry = FormRegistry::builtin();
        let fake = FormSpecBuilder::default()
            .key("haiku")
            .name("My Haiku")
            .lines(LineCount::Fixed(3))
            .build()
            .unwrap();
        assert!(matches!(registry.register(fake), Err(ProsodyError::BuiltinForm(_))));
        assert_eq!(registry.get("haiku").unwrap().syllables.as_deref(), Some(&[5, 7, 5][..]));
    }

    #[test]
    fn new_key_never_replaces_a_form_with_that_display_name() {
        let mut registry = FormRegistry::builtin();
        let alpha = FormSpecBuilder::default()
            .key("alpha")
            .name("Beta")
            .lines(LineCount::Fixed(3))
            .build()
            .unwrap();
        let beta = FormSpecBuilder::default()
            .key("beta")
            .name("Gamma")
            .lines(LineCount::Fixed(7))
            .build()
            .unwrap();
        registry.register(alpha).unwrap();
        registry.register(beta).unwrap();

        assert_eq!(&registry.names()[5..], ["alpha", "beta"]);
        assert_eq!(registry.get("alpha").unwrap().lines, LineCount::Fixed(3));
        assert_eq!(registry.get("beta").unwrap().lines, LineCount::Fixed(7));
        assert_eq!(registry.get("gamma").unwrap().key, "beta");

        let renamed = FormSpecBuilder::default()
            .key("alpha")
            .name("Delta")
            .lines(LineCount::Fixed(4))
            .build()
            .unwrap();
        registry.register(renamed).unwrap();
        assert_eq!(registry.names().len(), 7);
        assert_eq!(registry.get("delta").unwrap().lines, LineCount::Fixed(4));
        assert_eq!(registry.get("beta").unwrap().lines, LineCount::Fixed(7));
    }

    #[test]
    fn rejects_meters_no_line_could_fill() {
        let mut registry = FormRegistry::builtin();
        let endless = FormSpec {
            key: "endless".to_string(),
            name: "Endless".to_string(),
            description: String::new(),
            lines: LineCount::Variable,
            syllables: None,
            rhyme_scheme: None,
            meter: Some(MeterTemplate::new(Foot::Iambic, Some(usize::MAX / 2))),
        };
        assert!(matches!(
            registry.register(endless),
            Err(ProsodyError::InvalidForm(_))
        ));
        assert!(!registry.contains("endless"));

        assert!(FormSpecBuilder::default()
            .key("long")
            .name("Long")
            .lines(LineCount::Variable)
            .meter(MeterTemplate::new(Foot::Anapestic, Some(40)))
            .build()
            .is_err());
    }

    #[test]
    fn builder_enforces_per_line_lengths() {
        let err = FormSpecBuilder::default()
            .key("broken")
            .name("Broken")
            .lines(LineCount::Fixed(4))
            .rhyme_scheme(parse_scheme("ABA"))
            .build()
            .unwrap_err();
        assert!(ProsodyError::from(err).to_string().contains("rhyme scheme"));

        assert!(FormSpecBuilder::default()
            .key("loose")
            .name("Loose")
            .lines(LineCount::Variable)
            .syllables(vec![7])
            .build()
            .is_err());

        assert!(FormSpecBuilder::default().key("nameless").build().is_err());
    }

    #[test]
    fn loads_forms_from_json() {
        let mut registry = FormRegistry::builtin();
        let added = registry
            .register_json(
                r#"[{
                    "key": "couplet",
                    "name": "Couplet",
                    "lines": {"fixed": 2},
                    "rhyme_scheme": ["A", "A"],
                    "meter": {"foot": "iambic", "feet": 4}
                }]"#,
            )
            .unwrap();
        assert_eq!(added, 1);
        let couplet = registry.get("couplet").unwrap();
        assert_eq!(couplet.meter.unwrap().positions(), Some(8));
        assert!(couplet.syllables.is_none());

        let bad = registry.register_json(r#"[{"key": "x", "name": "X", "lines": {"fixed": 2}, "syllables": [1]}]"#);
        assert!(matches!(bad, Err(ProsodyError::InvalidForm(_))));
        assert!(registry.register_json("not json").is_err());
    }
}

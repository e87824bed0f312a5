//! The configuration store and its access methods.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use bruin_collections::OrderedMap;
use bruin_core::{ConfigError, Error, Result};
use bruin_file::Includer;

use crate::parser::{self, ParsedSection};
use crate::substitution;
use crate::value::FromConfigValue;

/// Name of the section whose options serve as fallbacks for every
/// other section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// An INI-style configuration with include preprocessing and variable
/// substitution.
///
/// A configuration is a sequence of named sections, each holding
/// ordered `option = value` pairs. On top of the plain syntax it
/// layers:
///
/// - `%include "path"` preprocessing, resolved before parsing (see
///   [`Includer`]),
/// - `${option}` and `${section:option}` variable substitution,
///   applied when values are retrieved,
/// - a defaults table, populated from a `[DEFAULT]` section or
///   [`with_defaults`](Configuration::with_defaults), consulted when a
///   section lacks an option.
///
/// Sections and options preserve the order in which they were first
/// seen, across any number of reads. Reading the same section again
/// merges new options into it rather than replacing it.
///
/// Option values that are missing, or that expand to nothing but
/// whitespace, are reported as absent.
///
/// # Examples
///
/// ```
/// use bruin_config::Configuration;
///
/// # fn main() -> bruin_core::Result<()> {
/// let mut config = Configuration::new();
/// config.read_str(
///     "[server]\n\
///      host = example.com\n\
///      url = http://${host}/api\n",
/// )?;
///
/// assert_eq!(config.get("server", "url")?, "http://example.com/api");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    sections: OrderedMap<String, OrderedMap<String, String>>,
    defaults: OrderedMap<String, String>,
    strict_substitution: bool,
    permit_includes: bool,
}

impl Configuration {
    /// Create an empty configuration.
    ///
    /// Substitution is lenient and `%include` processing is enabled.
    pub fn new() -> Self {
        Self {
            sections: OrderedMap::new(),
            defaults: OrderedMap::new(),
            strict_substitution: false,
            permit_includes: true,
        }
    }

    /// Seed the defaults table.
    pub fn with_defaults<I>(mut self, defaults: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (option, value) in defaults {
            self.defaults.insert(option, value);
        }
        self
    }

    /// Control how unresolvable variable references are handled.
    ///
    /// When strict, retrieval fails with
    /// [`ConfigError::NoVariable`]; when lenient (the default), the
    /// reference expands to an empty string.
    pub fn with_strict_substitution(mut self, strict: bool) -> Self {
        self.strict_substitution = strict;
        self
    }

    /// Enable or disable `%include` preprocessing.
    pub fn with_includes(mut self, permit: bool) -> Self {
        self.permit_includes = permit;
        self
    }

    /// Whether unresolvable references are errors.
    pub fn strict_substitution(&self) -> bool {
        self.strict_substitution
    }

    /// Whether `%include` directives are processed.
    pub fn includes_permitted(&self) -> bool {
        self.permit_includes
    }

    /// Read and merge a configuration file.
    ///
    /// Relative `%include` targets are resolved against the directory
    /// of the file that names them.
    pub fn read_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        debug!("reading configuration from {}", path.display());
        let text = if self.permit_includes {
            Includer::from_path(path)?.into_string()
        } else {
            fs::read_to_string(path)?
        };
        self.merge_text(&text)
    }

    /// Read and merge several configuration files, in order.
    ///
    /// A file that cannot be read or parsed is skipped with a logged
    /// warning; it contributes nothing to the configuration. Returns
    /// the paths that were merged successfully.
    pub fn read_files<P, I>(&mut self, paths: I) -> Vec<PathBuf>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = P>,
    {
        let mut read = Vec::new();
        for path in paths {
            let path = path.as_ref();
            match self.read_file(path) {
                Ok(()) => read.push(path.to_path_buf()),
                Err(error) => {
                    warn!("skipping configuration file {}: {}", path.display(), error)
                }
            }
        }
        read
    }

    /// Read and merge configuration text.
    ///
    /// `%include` targets must be absolute, since the text has no
    /// location of its own.
    pub fn read_str(&mut self, text: &str) -> Result<()> {
        let text = if self.permit_includes {
            Includer::from_reader(text.as_bytes(), None)?.into_string()
        } else {
            text.to_string()
        };
        self.merge_text(&text)
    }

    /// Read and merge configuration text from a reader.
    ///
    /// Relative `%include` targets are resolved against `base_dir` if
    /// one is given.
    pub fn read_from<R: BufRead>(&mut self, mut reader: R, base_dir: Option<&Path>) -> Result<()> {
        let text = if self.permit_includes {
            Includer::from_reader(reader, base_dir)?.into_string()
        } else {
            let mut text = String::new();
            reader.read_to_string(&mut text)?;
            text
        };
        self.merge_text(&text)
    }

    fn merge_text(&mut self, text: &str) -> Result<()> {
        let parsed = parser::parse(text)?;
        self.merge_sections(parsed);
        Ok(())
    }

    fn merge_sections(&mut self, parsed: Vec<ParsedSection>) {
        for section in parsed {
            if section.name == DEFAULT_SECTION {
                for (option, value) in section.options {
                    self.defaults.insert(option, value);
                }
                continue;
            }

            if !self.sections.contains_key(section.name.as_str()) {
                self.sections.insert(section.name.clone(), OrderedMap::new());
            }
            if let Some(options) = self.sections.get_mut(section.name.as_str()) {
                for (option, value) in section.options {
                    options.insert(option, value);
                }
            }
        }
    }

    /// Section names, in the order first seen.
    pub fn sections(&self) -> impl Iterator<Item = &str> + '_ {
        self.sections.keys().map(String::as_str)
    }

    /// Whether `section` exists.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Add an empty section.
    ///
    /// Names should match the file syntax (letters, digits, `_` and
    /// `.`, two characters or more) if the configuration is to be
    /// written out and read back.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::DuplicateSection`] if the section
    /// already exists.
    pub fn add_section(&mut self, section: &str) -> Result<()> {
        if self.has_section(section) {
            return Err(Error::Config(ConfigError::DuplicateSection(
                section.to_string(),
            )));
        }
        self.sections.insert(section.to_string(), OrderedMap::new());
        Ok(())
    }

    /// Remove a section and its options.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::NoSection`] if the section does not
    /// exist.
    pub fn remove_section(&mut self, section: &str) -> Result<()> {
        match self.sections.remove(section) {
            Some(_) => Ok(()),
            None => Err(Error::Config(ConfigError::NoSection(section.to_string()))),
        }
    }

    /// The defaults table, in order.
    pub fn defaults(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.defaults
            .iter()
            .map(|(option, value)| (option.as_str(), value.as_str()))
    }

    /// Set a default value.
    pub fn set_default(&mut self, option: &str, value: &str) {
        self.defaults.insert(option.to_string(), value.to_string());
    }

    /// Option names visible in `section`: its own options in order,
    /// then any defaults it does not shadow.
    pub fn options(&self, section: &str) -> Result<impl Iterator<Item = &str> + '_> {
        let own = self.section_map(section)?;
        Ok(own.keys().map(String::as_str).chain(
            self.defaults
                .keys()
                .filter(move |option| !own.contains_key(option.as_str()))
                .map(String::as_str),
        ))
    }

    /// Whether `option` is visible in `section`, through the section
    /// itself or the defaults table.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        match self.sections.get(section) {
            Some(own) => own.contains_key(option) || self.defaults.contains_key(option),
            None => false,
        }
    }

    /// Every visible option of `section` with its substituted value.
    pub fn items(&self, section: &str) -> Result<Vec<(String, String)>> {
        let options: Vec<String> = self.options(section)?.map(str::to_string).collect();
        let mut items = Vec::with_capacity(options.len());
        for option in options {
            if let Some(raw) = self.raw_value(section, &option) {
                let value = substitution::expand(self, section, &option, raw)?;
                items.push((option, value));
            }
        }
        Ok(items)
    }

    /// Set an option in an existing section.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::NoSection`] if the section does not
    /// exist.
    pub fn set(&mut self, section: &str, option: &str, value: &str) -> Result<()> {
        match self.sections.get_mut(section) {
            Some(options) => {
                options.insert(option.to_string(), value.to_string());
                Ok(())
            }
            None => Err(Error::Config(ConfigError::NoSection(section.to_string()))),
        }
    }

    /// Retrieve an option's value with variables substituted.
    ///
    /// # Errors
    ///
    /// Fails with [`ConfigError::NoSection`] if the section does not
    /// exist, and with [`ConfigError::NoOption`] if the option is
    /// absent or its expanded value contains nothing but whitespace.
    pub fn get(&self, section: &str, option: &str) -> Result<String> {
        let own = self.section_map(section)?;
        let raw = own
            .get(option)
            .or_else(|| self.defaults.get(option))
            .map(String::as_str)
            .ok_or_else(|| no_option(section, option))?;

        let expanded = substitution::expand(self, section, option, raw)?;
        if expanded.trim().is_empty() {
            return Err(no_option(section, option));
        }
        Ok(expanded)
    }

    /// Like [`get`](Configuration::get), but absence is `Ok(None)`
    /// rather than an error. Substitution failures still fail.
    pub fn get_opt(&self, section: &str, option: &str) -> Result<Option<String>> {
        match self.get(section, option) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Config(ConfigError::NoSection(_)))
            | Err(Error::Config(ConfigError::NoOption { .. })) => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Retrieve an option converted to `T`.
    ///
    /// # Errors
    ///
    /// In addition to the [`get`](Configuration::get) errors, fails
    /// with [`ConfigError::InvalidValue`] when the value does not parse
    /// as `T`.
    pub fn get_as<T: FromConfigValue>(&self, section: &str, option: &str) -> Result<T> {
        let value = self.get(section, option)?;
        match T::from_config_value(&value) {
            Some(converted) => Ok(converted),
            None => Err(invalid_value::<T>(section, option, value)),
        }
    }

    /// Like [`get_as`](Configuration::get_as), but absence is
    /// `Ok(None)`. A present value that fails to convert is still an
    /// error.
    pub fn get_as_opt<T: FromConfigValue>(
        &self,
        section: &str,
        option: &str,
    ) -> Result<Option<T>> {
        match self.get_opt(section, option)? {
            Some(value) => match T::from_config_value(&value) {
                Some(converted) => Ok(Some(converted)),
                None => Err(invalid_value::<T>(section, option, value)),
            },
            None => Ok(None),
        }
    }

    /// Retrieve an option as an integer.
    pub fn get_int(&self, section: &str, option: &str) -> Result<i64> {
        self.get_as(section, option)
    }

    /// Retrieve an option as a floating-point number.
    pub fn get_float(&self, section: &str, option: &str) -> Result<f64> {
        self.get_as(section, option)
    }

    /// Retrieve an option as a boolean, using the
    /// [`str_to_bool`](bruin_core::text::str_to_bool) vocabulary.
    pub fn get_bool(&self, section: &str, option: &str) -> Result<bool> {
        self.get_as(section, option)
    }

    /// Retrieve an option split into a list.
    ///
    /// With `separator` as `None` the value splits on runs of
    /// whitespace. With an explicit separator the fields are kept
    /// verbatim, empty fields included.
    pub fn get_list(
        &self,
        section: &str,
        option: &str,
        separator: Option<&str>,
    ) -> Result<Vec<String>> {
        let value = self.get(section, option)?;
        let fields = match separator {
            Some(separator) => value.split(separator).map(str::to_string).collect(),
            None => value.split_whitespace().map(str::to_string).collect(),
        };
        Ok(fields)
    }

    /// Write the configuration with all variables substituted.
    ///
    /// The defaults table is written first as `[DEFAULT]`, verbatim;
    /// section values are written expanded, so the output shows the
    /// effective configuration. Each section is followed by a blank
    /// line, and multi-line values are indented, so the output parses
    /// back.
    pub fn write<W: Write>(&self, mut out: W) -> Result<()> {
        if !self.defaults.is_empty() {
            writeln!(out, "[{DEFAULT_SECTION}]")?;
            for (option, value) in self.defaults.iter() {
                writeln!(out, "{} = {}", option, indent_continuations(value))?;
            }
            writeln!(out)?;
        }

        for (section, own) in self.sections.iter() {
            writeln!(out, "[{section}]")?;
            for (option, raw) in own.iter() {
                let value = substitution::expand(self, section, option, raw)?;
                writeln!(out, "{} = {}", option, indent_continuations(&value))?;
            }
            writeln!(out)?;
        }

        Ok(())
    }

    /// The stored, unsubstituted value visible for `option` in
    /// `section`.
    pub(crate) fn raw_value(&self, section: &str, option: &str) -> Option<&str> {
        let own = self.sections.get(section)?;
        own.get(option)
            .or_else(|| self.defaults.get(option))
            .map(String::as_str)
    }

    fn section_map(&self, section: &str) -> Result<&OrderedMap<String, String>> {
        self.sections
            .get(section)
            .ok_or_else(|| Error::Config(ConfigError::NoSection(section.to_string())))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a configuration file and write its fully expanded form, with
/// includes pulled in and variables substituted, to a temporary file.
///
/// Useful for handing a plain file to code that knows nothing about
/// includes or substitution. The temporary file is deleted when the
/// returned handle is dropped.
pub fn preprocess<P: AsRef<Path>>(path: P) -> Result<NamedTempFile> {
    let mut config = Configuration::new();
    config.read_file(path)?;

    let mut file = tempfile::Builder::new()
        .prefix("bruincfg")
        .suffix(".cfg")
        .tempfile()?;
    config.write(file.as_file_mut())?;
    file.as_file_mut().flush()?;
    Ok(file)
}

fn no_option(section: &str, option: &str) -> Error {
    Error::Config(ConfigError::NoOption {
        section: section.to_string(),
        option: option.to_string(),
    })
}

fn invalid_value<T: FromConfigValue>(section: &str, option: &str, value: String) -> Error {
    Error::Config(ConfigError::InvalidValue {
        section: section.to_string(),
        option: option.to_string(),
        value,
        expected: T::EXPECTED,
    })
}

fn indent_continuations(value: &str) -> String {
    value.replace('\n', "\n    ")
}

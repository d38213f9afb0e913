//! Wavefront material library reader
//!
//! Each `newmtl` block becomes one [`MtlData`] entry. The scene engine turns
//! entries into Phong-style materials when an external model is
//! instantiated; texture map paths are carried through as data.

use std::collections::HashMap;

use thiserror::Error;

use crate::foundation::math::Vec3;

/// One material block of a library
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Name given by `newmtl`
    pub name: String,
    /// `Ka`
    pub ambient: Vec3,
    /// `Kd`
    pub diffuse: Vec3,
    /// `Ks`
    pub specular: Vec3,
    /// `Ke`
    pub emission: Vec3,
    /// `Ns`
    pub specular_exponent: f32,
    /// Opacity from `d`, or `1 - Tr`
    pub dissolve: f32,
    /// `illum`
    pub illumination_model: u32,
    /// `map_Kd`
    pub diffuse_map: Option<String>,
    /// `map_Bump` / `bump`
    pub normal_map: Option<String>,
}

impl MtlData {
    fn named(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }

    fn apply(&mut self, statement: &mut Statement<'_>) -> Result<(), MtlError> {
        match statement.keyword {
            "Ka" => self.ambient = statement.color()?,
            "Kd" => self.diffuse = statement.color()?,
            "Ks" => self.specular = statement.color()?,
            "Ke" => self.emission = statement.color()?,
            "Ns" => self.specular_exponent = statement.float()?,
            "d" => self.dissolve = statement.float()?,
            "Tr" => self.dissolve = 1.0 - statement.float()?,
            "illum" => self.illumination_model = statement.integer()?,
            "map_Kd" => self.diffuse_map = Some(statement.rest()?),
            "map_Bump" | "bump" => self.normal_map = Some(statement.rest()?),
            _ => {}
        }
        Ok(())
    }
}

impl Default for MtlData {
    fn default() -> Self {
        Self {
            name: String::new(),
            ambient: Vec3::from_element(1.0),
            diffuse: Vec3::from_element(0.8),
            specular: Vec3::from_element(0.5),
            emission: Vec3::zeros(),
            specular_exponent: 250.0,
            dissolve: 1.0,
            illumination_model: 2,
            diffuse_map: None,
            normal_map: None,
        }
    }
}

/// MTL parse failure with the offending line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("MTL line {line}: {message}")]
pub struct MtlError {
    /// 1-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

/// A single keyword line and its remaining arguments
struct Statement<'a> {
    line: usize,
    keyword: &'a str,
    args: std::str::SplitWhitespace<'a>,
}

impl<'a> Statement<'a> {
    fn error(&self, message: String) -> MtlError {
        MtlError { line: self.line, message: format!("{} {}", self.keyword, message) }
    }

    fn word(&mut self) -> Result<&'a str, MtlError> {
        self.args.next().ok_or_else(|| self.error("missing value".to_string()))
    }

    fn float(&mut self) -> Result<f32, MtlError> {
        let word = self.word()?;
        word.parse().map_err(|_| self.error(format!("invalid float value '{word}'")))
    }

    fn integer(&mut self) -> Result<u32, MtlError> {
        let word = self.word()?;
        word.parse().map_err(|_| self.error(format!("invalid integer value '{word}'")))
    }

    fn color(&mut self) -> Result<Vec3, MtlError> {
        Ok(Vec3::new(self.float()?, self.float()?, self.float()?))
    }

    /// Remainder of the line; map paths may contain spaces
    fn rest(&mut self) -> Result<String, MtlError> {
        let words: Vec<&str> = self.args.by_ref().collect();
        if words.is_empty() {
            return Err(self.error("missing texture path".to_string()));
        }
        Ok(words.join(" "))
    }
}

/// Material library parser
pub struct MtlParser;

impl MtlParser {
    /// Parse a whole library, keyed by material name
    ///
    /// Statements before the first `newmtl` have no material to attach to and
    /// are ignored, as are unknown keywords.
    pub fn parse(contents: &str) -> Result<HashMap<String, MtlData>, MtlError> {
        let mut library = HashMap::new();
        let mut current: Option<MtlData> = None;

        for (index, raw) in contents.lines().enumerate() {
            let mut args = raw.split_whitespace();
            let Some(keyword) = args.next().filter(|k| !k.starts_with('#')) else {
                continue;
            };
            let mut statement = Statement { line: index + 1, keyword, args };

            if keyword == "newmtl" {
                let name = statement.word()?;
                if let Some(done) = current.replace(MtlData::named(name)) {
                    library.insert(done.name.clone(), done);
                }
            } else if let Some(material) = current.as_mut() {
                material.apply(&mut statement)?;
            }
        }

        if let Some(done) = current {
            library.insert(done.name.clone(), done);
        }
        Ok(library)
    }
}

//! # Codificador de Rótulos
//!
//! Bijeção entre o índice de classe usado pelo classificador (posição no
//! vetor de probabilidades) e o nome legível do idioma ("igbo", "hausa"...).
//! O número de classes é fixo na construção.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, ModelLoadError};

/// Mapeamento total e injetivo índice ↔ nome de idioma.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Cria o codificador ordenando os nomes lexicograficamente.
    ///
    /// É a mesma convenção de um codificador "ajustado" sobre os rótulos de
    /// treino: o índice 0 é o menor nome em ordem alfabética.
    pub fn new<I, S>(classes: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        Self::from_ordered(classes)
    }

    /// Cria o codificador mantendo a ordem recebida (índice = posição).
    pub fn from_ordered(classes: Vec<String>) -> Result<Self, LabelError> {
        if classes.is_empty() {
            return Err(LabelError::NoClasses);
        }
        let mut seen = HashSet::new();
        for class in &classes {
            if class.trim().is_empty() {
                return Err(LabelError::EmptyClass);
            }
            if !seen.insert(class.as_str()) {
                return Err(LabelError::DuplicateClass(class.clone()));
            }
        }
        Ok(Self { classes })
    }

    /// Carrega de um array JSON de nomes, na ordem dos índices.
    pub fn from_json_str(json: &str) -> Result<Self, ModelLoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Índice → nome.
    pub fn inverse_transform(&self, index: usize) -> Result<&str, LabelError> {
        self.classes
            .get(index)
            .map(String::as_str)
            .ok_or(LabelError::UnknownIndex {
                index,
                len: self.classes.len(),
            })
    }

    /// Nome → índice.
    pub fn transform(&self, name: &str) -> Result<usize, LabelError> {
        self.classes
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| LabelError::UnknownClass(name.to_string()))
    }
}

impl TryFrom<Vec<String>> for LabelEncoder {
    type Error = LabelError;

    fn try_from(classes: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_ordered(classes)
    }
}

impl From<LabelEncoder> for Vec<String> {
    fn from(encoder: LabelEncoder) -> Self {
        encoder.classes
    }
}

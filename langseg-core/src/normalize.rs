//! # Normalização de Texto
//!
//! Passo puro texto → texto aplicado antes da classificação. O classificador
//! vê apenas texto normalizado; os tokens devolvidos ao usuário continuam com
//! a grafia original.
//!
//! ## Etapas do [`Preprocess`]
//!
//! 1. **Pontuação**: minúsculas e remoção dos caracteres de pontuação ASCII
//!    (e do modificador `ʼ`, comum em ortografias nigerianas).
//! 2. **Espaços**: cada caractere de espaço em branco (e `+`) vira um espaço simples.
//! 3. **Diacríticos**: decomposição NFD seguida da remoção das marcas
//!    não-espaçadoras (categoria `Mn`). Assim "ẹ̀" e "e" caem no mesmo símbolo,
//!    mas sinais vocálicos espaçados (`Mc`, ex: "ि" em "कि") são mantidos.
//! 4. **Stop words**: remoção de palavras inteiras de uma lista fornecida.

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// Capacidade de normalizar texto antes da classificação.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Pontuação removida quando `remove_punct` está ativo.
const PUNCTUATION: &str = "ʼ!\"#$%&\\'()*+,-./:;<=>?@[]^_`{|}~";

/// Normalizador padrão: minúsculas, sem pontuação, sem diacríticos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preprocess {
    pub remove_punct: bool,
    pub stop_words: Vec<String>,
    pub normalize: bool,
}

impl Preprocess {
    pub fn new() -> Self {
        Self {
            remove_punct: true,
            stop_words: Vec::new(),
            normalize: true,
        }
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }
}

impl Default for Preprocess {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for Preprocess {
    fn normalize(&self, text: &str) -> String {
        let lower = text.to_lowercase();

        let mut cleaned: String = lower
            .chars()
            .filter(|c| !(self.remove_punct && PUNCTUATION.contains(*c)))
            .map(|c| if c.is_whitespace() || c == '+' { ' ' } else { c })
            .collect();

        if self.normalize {
            cleaned = fold_diacritics(&cleaned);
        }

        if self.stop_words.is_empty() {
            return cleaned;
        }

        // Remove a palavra mas mantém o espaço, preservando as fronteiras
        cleaned
            .split(' ')
            .map(|word| {
                if self.stop_words.iter().any(|s| s == word) {
                    ""
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decomposição NFD sem as marcas não-espaçadoras.
///
/// Só as marcas com classe combinante canônica diferente de zero são
/// removidas; sinais espaçados (`Mc`) têm classe zero e ficam no texto.
pub fn fold_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

/// Normalizador identidade, útil quando o classificador já trata o texto cru.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Normalizer for Identity {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_strips_punctuation_and_case() {
        let p = Preprocess::new();
        assert_eq!(p.normalize("Omo, I no KNOW!"), "omo i no know");
    }

    #[test]
    fn test_preprocess_folds_diacritics() {
        let p = Preprocess::new();
        assert_eq!(p.normalize("Ẹ rán ẹnikan"), "e ran enikan");
    }

    #[test]
    fn test_preprocess_keeps_spacing_marks() {
        let p = Preprocess {
            remove_punct: false,
            ..Preprocess::new()
        };
        // U+093F (DEVANAGARI VOWEL SIGN I) é `Mc`
        assert_eq!(p.normalize("कि"), "कि");
        assert_eq!(fold_diacritics("कि"), "कि");
        // Tom sobre vogal ainda é removido
        assert_eq!(fold_diacritics("kọ̀"), "ko");
    }

    #[test]
    fn test_preprocess_keeps_diacritics_when_disabled() {
        let p = Preprocess {
            normalize: false,
            ..Preprocess::new()
        };
        assert_eq!(p.normalize("rán"), "rán");
    }

    #[test]
    fn test_preprocess_whitespace_becomes_space() {
        let p = Preprocess::new();
        assert_eq!(p.normalize("a\nb\tc"), "a b c");
    }

    #[test]
    fn test_preprocess_only_punctuation_is_blank() {
        let p = Preprocess::new();
        assert!(p.normalize("... !? --").trim().is_empty());
    }

    #[test]
    fn test_preprocess_stop_words() {
        let p = Preprocess::new().with_stop_words(["the", "A"]);
        assert_eq!(p.normalize("The cat and a dog"), " cat and  dog");
    }

    #[test]
    fn test_identity() {
        assert_eq!(Identity.normalize("Ẹ!"), "Ẹ!");
    }
}

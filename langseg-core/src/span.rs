//! # Construção e Suavização de Spans
//!
//! Transforma a sequência de rótulos por token numa lista mínima de spans
//! contíguos e rotulados cobrindo todo o texto.
//!
//! ## Algoritmo
//! 1. **Construção**: uma passada agrupa tokens consecutivos de mesmo rótulo
//!    em spans maximais `[start, end)`, sem lacunas nem sobreposições.
//! 2. **Suavização** (limiar `k`): da esquerda para a direita, um span é
//!    absorvido pelo span de saída anterior quando
//!    - é mais curto que `k` (exceto o primeiro span processado), ou
//!    - repete o rótulo do span de saída anterior.
//!
//!    O span absorvente estende seu `end` e mantém o próprio rótulo.
//!    Nenhum token é descartado: só a fronteira se move.
//! 3. **Reescrita**: o rótulo de cada span final é copiado para todos os
//!    tokens que ele cobre, mantendo tokens e spans consistentes.
//!
//! ## Exemplo
//! Com `k = 4`:
//! `[en ×6][ha ×3][en ×6]` → `[en ×9]` (curto) → `[en ×15]` (duplicado).

use serde::{Deserialize, Serialize};

use crate::tagger::LabeledToken;

/// Representa um span (intervalo) de tokens com uma label associada.
///
/// # Exemplo
/// Em "omo I no know how e take be like this", um span pidgin cobrindo tudo:
/// `Span { start: 0, end: 10, label: "pidgin" }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
    /// Idioma do span (ex: "hausa", "english")
    pub label: String,
}

impl Span {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Registro de uma fusão feita pela suavização.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanMerge {
    /// Span que deixou de existir.
    pub absorbed: Span,
    /// Span resultante, já estendido.
    pub into: Span,
}

/// Agrupa rótulos consecutivos iguais em spans maximais.
pub fn build_spans_from_labels<S: AsRef<str>>(labels: &[S]) -> Vec<Span> {
    let mut spans: Vec<Span> = Vec::new();
    // Sentinela "sem rótulo anterior": a primeira iteração sempre abre um span
    let mut prev: Option<&str> = None;

    for (i, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        if prev == Some(label) {
            if let Some(current) = spans.last_mut() {
                current.end = i + 1;
            }
        } else {
            spans.push(Span {
                start: i,
                end: i + 1,
                label: label.to_string(),
            });
        }
        prev = Some(label);
    }
    spans
}

/// Agrupa tokens rotulados em spans maximais.
pub fn build_spans(labeled: &[LabeledToken]) -> Vec<Span> {
    let labels: Vec<&str> = labeled.iter().map(|l| l.label.as_str()).collect();
    build_spans_from_labels(&labels)
}

/// Suaviza a lista de spans com limiar `k`.
pub fn smooth(spans: Vec<Span>, k: usize) -> Vec<Span> {
    smooth_with(spans, k, |_| {})
}

/// Igual a [`smooth`], notificando cada fusão.
///
/// Passada única: só o span de saída imediatamente anterior é reexaminado,
/// mas fusões em cascata aparecem naturalmente via a checagem de duplicata.
pub fn smooth_with(spans: Vec<Span>, k: usize, mut on_merge: impl FnMut(SpanMerge)) -> Vec<Span> {
    let mut out: Vec<Span> = Vec::with_capacity(spans.len());

    for (i, span) in spans.into_iter().enumerate() {
        let duplicate = out.last().is_some_and(|last| last.label == span.label);
        let too_short = i > 0 && span.len() < k;

        if too_short || duplicate {
            if let Some(prev) = out.last_mut() {
                prev.end = span.end;
                on_merge(SpanMerge {
                    absorbed: span,
                    into: prev.clone(),
                });
                continue;
            }
        }
        out.push(span);
    }
    out
}

/// Reescreve o rótulo de cada token com o rótulo do span que o cobre.
pub fn apply_spans(labeled: &mut [LabeledToken], spans: &[Span]) {
    for span in spans {
        for token in &mut labeled[span.start..span.end] {
            token.label.clone_from(&span.label);
        }
    }
}

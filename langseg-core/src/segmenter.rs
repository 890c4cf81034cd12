//! # Segmentador por N-gramas — Orquestrador com Eventos Observáveis
//!
//! O [`NgramSegmenter`] coordena os estágios na ordem fixa
//! tokenização → agregação de evidência → rotulação → spans → suavização.
//! Nenhum estágio chama de volta um estágio anterior.
//!
//! Cada chamada de [`NgramSegmenter::extract`] é independente: todas as
//! estruturas intermediárias pertencem à chamada e nada é guardado entre
//! chamadas. O classificador e o codificador são somente-leitura, então um
//! mesmo segmentador pode ser compartilhado entre threads.
//!
//! Além da API síncrona, [`NgramSegmenter::extract_streaming`] emite eventos
//! via um canal Rust (`mpsc`), permitindo que o servidor WebSocket transmita
//! o progresso passo a passo.

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{Classifier, ClassifierAdapter};
use crate::config::{SegmentParams, SegmenterConfig};
use crate::error::SegmentError;
use crate::label_encoder::LabelEncoder;
use crate::ngram::{accumulate, ngram_windows, score_windows};
use crate::normalize::{Normalizer, Preprocess};
use crate::span::{apply_spans, build_spans, smooth_with, Span};
use crate::tagger::{label_tokens, LabeledToken};
use crate::tokenizer::{join_tokens, tokenize, Token};

/// Um trecho do texto e o idioma atribuído a ele.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Tokens originais do span unidos por um espaço.
    pub text: String,
    pub label: String,
}

/// Resultado completo de uma chamada, já sem o token terminal sintético.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub tokens: Vec<Token>,
    /// Rótulos por token, já corrigidos pela suavização.
    pub labeled_tokens: Vec<LabeledToken>,
    /// Spans finais, cobrindo `tokens` sem lacunas nem sobreposições.
    pub spans: Vec<Span>,
}

impl Extraction {
    /// Pares `(texto do span, idioma)` na ordem do texto.
    pub fn segments(&self) -> Vec<Segment> {
        self.spans
            .iter()
            .map(|span| Segment {
                text: join_tokens(&self.tokens[span.start..span.end]),
                label: span.label.clone(),
            })
            .collect()
    }
}

/// Eventos emitidos durante a segmentação.
///
/// Permitem que um cliente visualize o "raciocínio" do segmentador passo a passo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SegmentEvent {
    /// **Passo 1**: Tokenização concluída (inclui o token terminal).
    TokenizationDone { tokens: Vec<Token>, total: usize },
    /// **Passo 2**: Uma janela de n-gramas foi pontuada.
    WindowScored {
        start: usize,
        end: usize,
        text: String,
        probabilities: Vec<f64>,
    },
    /// **Passo 3**: Rótulo argmax de cada token real.
    TokensLabeled { labels: Vec<String> },
    /// **Passo 4**: Spans maximais antes da suavização.
    SpansBuilt { spans: Vec<Span> },
    /// **Passo 5**: A suavização absorveu um span.
    SpanMerged { absorbed: Span, into: Span },
    /// **Conclusão**: Resultado final.
    Done {
        extraction: Extraction,
        processing_ms: u64,
    },
    /// **Falha**: A chamada foi abortada; nenhum resultado parcial é emitido.
    Error { message: String },
}

/// Segmentador de texto multilíngue por janelas de n-gramas.
pub struct NgramSegmenter<C> {
    adapter: ClassifierAdapter<C>,
    encoder: LabelEncoder,
    normalizer: Box<dyn Normalizer>,
    config: SegmenterConfig,
}

impl<C: Classifier> NgramSegmenter<C> {
    /// Cria o segmentador, validando que classificador e codificador
    /// concordam sobre o número de classes.
    pub fn new(classifier: C, encoder: LabelEncoder) -> Result<Self, SegmentError> {
        let adapter = ClassifierAdapter::new(classifier, &encoder)?;
        Ok(Self {
            adapter,
            encoder,
            normalizer: Box::new(Preprocess::default()),
            config: SegmenterConfig::default(),
        })
    }

    /// Normalizador usado para rejeitar textos que ficam vazios após a limpeza.
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn with_config(mut self, config: SegmenterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encoder(&self) -> &LabelEncoder {
        &self.encoder
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    pub fn classifier(&self) -> &C {
        self.adapter.inner()
    }

    /// Segmenta o texto e devolve tokens, rótulos por token e spans finais.
    pub fn extract(&self, text: &str, params: SegmentParams) -> Result<Extraction, SegmentError> {
        self.run(text, params, &mut |_: SegmentEvent| {})
    }

    /// Atalho para `extract(..).segments()`.
    pub fn segment(&self, text: &str, params: SegmentParams) -> Result<Vec<Segment>, SegmentError> {
        Ok(self.extract(text, params)?.segments())
    }

    /// Executa a segmentação enviando eventos de progresso pelo canal `tx`.
    ///
    /// O último evento é sempre `Done` ou `Error`.
    pub fn extract_streaming(&self, text: &str, params: SegmentParams, tx: mpsc::Sender<SegmentEvent>) {
        let start = Instant::now();
        let result = self.run(text, params, &mut |event: SegmentEvent| {
            let _ = tx.send(event);
        });

        let last = match result {
            Ok(extraction) => SegmentEvent::Done {
                extraction,
                processing_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => SegmentEvent::Error {
                message: e.to_string(),
            },
        };
        let _ = tx.send(last);
    }

    fn run(
        &self,
        text: &str,
        params: SegmentParams,
        emit: &mut dyn FnMut(SegmentEvent),
    ) -> Result<Extraction, SegmentError> {
        params.validate()?;
        if self.normalizer.normalize(text).trim().is_empty() {
            return Err(SegmentError::invalid_parameter("texto vazio após normalização"));
        }

        // === Passo 1: Tokenização ===
        let mut tokens = tokenize(text);
        if tokens.len() < 2 {
            return Err(SegmentError::invalid_parameter("texto sem tokens"));
        }
        emit(SegmentEvent::TokenizationDone {
            tokens: tokens.clone(),
            total: tokens.len(),
        });

        // === Passo 2: Agregação de evidência ===
        let windows = ngram_windows(tokens.len(), params.ngram);
        let parallel = self.config.use_parallel(windows.len());
        debug!(
            tokens = tokens.len(),
            windows = windows.len(),
            parallel,
            "pontuando janelas"
        );
        let scores = score_windows(&tokens, &windows, &self.adapter, parallel).map_err(|e| {
            warn!(error = %e, "agregação abortada");
            e
        })?;
        for score in &scores {
            emit(SegmentEvent::WindowScored {
                start: score.window.start,
                end: score.window.end(),
                text: score.text.clone(),
                probabilities: score.probabilities.clone(),
            });
        }
        let matrix = accumulate(tokens.len(), self.adapter.n_classes(), &scores);

        // === Passo 3: Rotulação ===
        let mut labeled = label_tokens(&tokens, &matrix, &self.encoder)?;
        // O terminal sintético só serve à enumeração das janelas
        tokens.pop();
        labeled.pop();
        emit(SegmentEvent::TokensLabeled {
            labels: labeled.iter().map(|l| l.label.clone()).collect(),
        });

        // === Passo 4: Spans ===
        let spans = build_spans(&labeled);
        let built = spans.len();
        emit(SegmentEvent::SpansBuilt {
            spans: spans.clone(),
        });

        // === Passo 5: Suavização e reescrita ===
        let spans = smooth_with(spans, params.k, |merge| {
            emit(SegmentEvent::SpanMerged {
                absorbed: merge.absorbed,
                into: merge.into,
            })
        });
        apply_spans(&mut labeled, &spans);
        debug!(built, smoothed = spans.len(), k = params.k, "spans suavizados");

        Ok(Extraction {
            tokens,
            labeled_tokens: labeled,
            spans,
        })
    }
}

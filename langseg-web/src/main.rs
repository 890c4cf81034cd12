//! Servidor Axum com API JSON e WebSocket para segmentação de texto por idioma

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use clap::Parser;
use langseg_core::{
    Extraction, LexiconClassifier, NgramSegmenter, Pipeline, Preprocess, Segment, SegmentError,
    SegmentEvent, SegmentParams,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Segmenter = NgramSegmenter<Pipeline<Preprocess, LexiconClassifier>>;

/// Configuração do servidor
#[derive(Debug, Parser)]
#[command(name = "langseg-web", version, about = "Segmentação de texto por idioma via HTTP")]
struct Args {
    /// Endereço de escuta
    #[arg(long, env = "LANGSEG_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,

    /// Léxico JSON com as classes e palavras de cada idioma
    #[arg(long, env = "LANGSEG_MODEL")]
    model: PathBuf,

    /// Largura padrão da janela de n-gramas
    #[arg(long, env = "LANGSEG_NGRAM", default_value_t = langseg_core::config::DEFAULT_NGRAM)]
    ngram: usize,

    /// Limiar padrão de suavização
    #[arg(long, env = "LANGSEG_K", default_value_t = langseg_core::config::DEFAULT_K)]
    k: usize,

    /// Tempo máximo de uma segmentação, em milissegundos
    #[arg(long, env = "LANGSEG_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,
}

/// Estado compartilhado da aplicação
struct AppState {
    segmenter: Segmenter,
    defaults: SegmentParams,
    timeout: Duration,
}

/// Corpo de requisição: texto e parâmetros opcionais
#[derive(Deserialize)]
struct SegmentRequest {
    text: String,
    #[serde(default)]
    ngram: Option<usize>,
    #[serde(default)]
    k: Option<usize>,
}

impl SegmentRequest {
    fn params(&self, defaults: SegmentParams) -> SegmentParams {
        SegmentParams {
            ngram: self.ngram.unwrap_or(defaults.ngram),
            k: self.k.unwrap_or(defaults.k),
        }
    }
}

#[derive(Serialize)]
struct SegmentResponse {
    segments: Vec<Segment>,
    #[serde(flatten)]
    extraction: Extraction,
    processing_ms: u64,
}

/// Erro da API, convertido em `{"error": ...}`
enum ApiError {
    Segment(SegmentError),
    Timeout,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Segment(e @ SegmentError::InvalidParameter { .. }) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::Segment(e @ SegmentError::FailedClassification { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
            }
            ApiError::Segment(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Timeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "tempo de segmentação esgotado".to_string(),
            ),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let lexicon = LexiconClassifier::from_path(&args.model)?;
    let encoder = lexicon.encoder().clone();
    info!(
        "Léxico carregado de {} ({} idiomas)",
        args.model.display(),
        encoder.len()
    );
    let segmenter = NgramSegmenter::new(Pipeline::new(Preprocess::new(), lexicon), encoder)?;

    let state = Arc::new(AppState {
        segmenter,
        defaults: SegmentParams::new(args.ngram, args.k),
        timeout: Duration::from_millis(args.timeout_ms),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/segment", post(segment_handler))
        .route("/languages", get(languages_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!("Servidor de segmentação iniciado em http://{}", args.addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Segmentação via HTTP POST (sem streaming)
async fn segment_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SegmentRequest>,
) -> Result<Json<SegmentResponse>, ApiError> {
    let params = req.params(state.defaults);
    info!(
        "Segmentando via HTTP [ngram={} k={}]: {} chars",
        params.ngram,
        params.k,
        req.text.len()
    );

    let start = Instant::now();
    let worker_state = Arc::clone(&state);
    let handle =
        tokio::task::spawn_blocking(move || worker_state.segmenter.extract(&req.text, params));

    let extraction = match tokio::time::timeout(state.timeout, handle).await {
        Ok(Ok(result)) => result.map_err(ApiError::Segment)?,
        Ok(Err(join_error)) => return Err(ApiError::Internal(join_error.to_string())),
        Err(_) => {
            warn!("Segmentação excedeu {:?}", state.timeout);
            return Err(ApiError::Timeout);
        }
    };

    Ok(Json(SegmentResponse {
        segments: extraction.segments(),
        extraction,
        processing_ms: start.elapsed().as_millis() as u64,
    }))
}

/// Retorna os idiomas suportados, na ordem dos índices do classificador
async fn languages_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.segmenter.encoder().classes().to_vec())
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa o segmentador e envia os eventos
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text, ngram, k}; senão usa como texto puro
                let (text_str, params) = match serde_json::from_str::<SegmentRequest>(&text) {
                    Ok(req) => (req.text.trim().to_string(), req.params(state.defaults)),
                    Err(_) => (text.trim().to_string(), state.defaults),
                };

                if text_str.is_empty() {
                    continue;
                }

                info!(
                    "Segmentando via WebSocket [ngram={} k={}]: {} chars",
                    params.ngram,
                    params.k,
                    text_str.len()
                );

                let (tx, rx) = std::sync::mpsc::channel::<SegmentEvent>();
                let worker_state = Arc::clone(&state);
                let handle = tokio::task::spawn_blocking(move || {
                    worker_state
                        .segmenter
                        .extract_streaming(&text_str, params, tx);
                });

                let events: Vec<SegmentEvent> =
                    match tokio::time::timeout(state.timeout, handle).await {
                        Ok(Ok(())) => rx.try_iter().collect(),
                        Ok(Err(join_error)) => {
                            warn!("Segmentação interrompida: {}", join_error);
                            let mut events: Vec<SegmentEvent> = rx.try_iter().collect();
                            events.push(SegmentEvent::Error {
                                message: join_error.to_string(),
                            });
                            events
                        }
                        Err(_) => {
                            warn!("Segmentação excedeu {:?}", state.timeout);
                            vec![SegmentEvent::Error {
                                message: "tempo de segmentação esgotado".to_string(),
                            }]
                        }
                    };

                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}

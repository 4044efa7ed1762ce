// ============================================================================
// ERRORES - Tipos de error del reproductor, relay y fotos
// ============================================================================

use thiserror::Error;

/// Fallos al cargar o instanciar el runtime de Unity (terminales para la vista)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoaderError {
    #[error("no se pudo cargar el script del loader ({url})")]
    ScriptLoad { url: String },
    #[error("canvas #{0} no existe en el documento")]
    CanvasMissing(String),
    #[error("createUnityInstance no está definido (script del loader inválido)")]
    FactoryMissing,
    #[error("fallo creando la instancia de Unity: {0}")]
    Instantiation(String),
    #[error("error de DOM: {0}")]
    Dom(String),
}

/// Fallos del listado de fotos; siempre se convierten en estado de UI
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhotoError {
    #[error("HTTP {status}")]
    Http { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RelayError {
    #[error("no se pudo serializar el login: {0}")]
    Serialize(String),
    #[error("SendMessage falló: {0}")]
    SendMessage(String),
}

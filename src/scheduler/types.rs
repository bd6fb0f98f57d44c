use thiserror::Error;

/// Erreurs de validation des entrées du calcul.
///
/// Toutes sont détectées avant tout calcul : aucune chronologie partielle
/// n'est jamais renvoyée.
#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid rotation spec: {0}")]
    InvalidSpec(String),
    #[error("invalid window: {0}")]
    InvalidWindow(String),
    #[error("invalid override: {0}")]
    InvalidOverride(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Erreur d'entrée/sortie: {0}")]
    Io(#[from] std::io::Error),

    #[error("Erreur CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Erreur Excel: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Colonnes obligatoires manquantes: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Fichier vide ou sans données")]
    EmptyFile,

    #[error("Entrée invalide: {0}")]
    InvalidInput(String),

    #[error("Historique insuffisant: {required} points requis, {actual} fournis")]
    InsufficientData { required: usize, actual: usize },
}

impl serde::Serialize for DashboardError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

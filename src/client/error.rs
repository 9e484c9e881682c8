use thiserror::Error;

/// Roster operations, used for in-flight tracking and notice wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Load,
    LoadHistory,
    Add,
    Edit,
    Delete,
    TogglePresence,
    SetAllPresence,
    ResetWins,
    ResetAllWins,
    Spin,
}

impl Operation {
    /// 操作失败时展示给用户的提示
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::Load => "Erreur lors du chargement des personnes",
            Operation::LoadHistory => "Erreur lors du chargement de l'historique",
            Operation::Add => "Erreur lors de l'ajout de la personne",
            Operation::Edit => "Erreur lors de la modification",
            Operation::Delete => "Erreur lors de la suppression",
            Operation::TogglePresence => "Erreur lors de la mise à jour de la présence",
            Operation::SetAllPresence => "Erreur lors de la mise à jour des présences",
            Operation::ResetWins | Operation::ResetAllWins => "Erreur lors de la réinitialisation",
            Operation::Spin => "Erreur lors du tirage",
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote call failed with status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("No present persons to draw from")]
    NoEligible,

    #[error("Name must not be empty")]
    InvalidName,

    #[error("Person {0} is not in the roster")]
    UnknownPerson(i64),

    #[error("{0:?} is already in progress")]
    Busy(Operation),
}

impl ClientError {
    /// Localized text shown to the user when `op` fails with this error.
    /// Only the draw endpoint forwards the server's own message.
    pub fn notice_text(&self, op: Operation) -> String {
        match self {
            ClientError::NoEligible => "Aucune personne présente pour le tirage".to_string(),
            ClientError::InvalidName => "Le nom ne peut pas être vide".to_string(),
            ClientError::Busy(_) => "Une opération est déjà en cours".to_string(),
            ClientError::Status {
                message: Some(message),
                ..
            } if op == Operation::Spin => message.clone(),
            _ => op.failure_message().to_string(),
        }
    }
}

pub mod donnee;
pub mod enquete;
pub mod enqueteur;
pub mod fichier;
pub mod format;
pub mod stats;

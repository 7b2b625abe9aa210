use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::format::{french_date, timestamp};

/// The typed content of one dossier line.
///
/// Text fields keep the trimmed value as found in the file, including the empty
/// string. Dates and amounts are `None` when the source was empty or could not
/// be read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DossierFields {
    pub numero_dossier: String,
    pub reference_dossier: String,
    pub numero_interlocuteur: String,
    pub guid_interlocuteur: String,
    pub type_demande: String,
    pub numero_demande: String,
    pub numero_demande_contestee: String,
    pub numero_demande_initiale: String,
    pub forfait_demande: String,
    #[serde(with = "french_date", default)]
    pub date_retour_espere: Option<NaiveDate>,
    pub qualite: String,
    pub nom: String,
    pub prenom: String,
    #[serde(with = "french_date", default)]
    pub date_naissance: Option<NaiveDate>,
    pub lieu_naissance: String,
    pub code_postal_naissance: String,
    pub pays_naissance: String,
    pub nom_patronymique: String,
    pub adresse1: String,
    pub adresse2: String,
    pub adresse3: String,
    pub adresse4: String,
    pub ville: String,
    pub code_postal: String,
    pub pays_residence: String,
    pub telephone_personnel: String,
    pub telephone_employeur: String,
    pub telecopie_employeur: String,
    pub nom_employeur: String,
    pub banque_domiciliation: String,
    pub libelle_guichet: String,
    pub titulaire_compte: String,
    pub code_banque: String,
    pub code_guichet: String,
    pub numero_compte: String,
    pub rib_compte: String,
    #[serde(rename = "datedenvoie", with = "french_date", default)]
    pub date_envoi: Option<NaiveDate>,
    pub element_demandes: String,
    pub element_obligatoires: String,
    pub element_contestes: String,
    pub code_motif: String,
    pub motif_de_contestation: String,
    pub cumul_montants_precedents: Option<f64>,
    #[serde(rename = "codesociete")]
    pub code_societe: String,
    pub urgence: String,
    pub commentaire: String,
}

/// A persisted dossier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donnee {
    pub id: i64,
    pub fichier_id: i64,
    #[serde(flatten)]
    pub fields: DossierFields,
    pub enqueteur_id: Option<i64>,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

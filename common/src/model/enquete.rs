//! Investigator findings attached one-to-one to a dossier.
//!
//! The field list is long and flat, so [`AnnotationFields`] and its partial
//! update [`AnnotationPatch`] are generated from a single declaration to keep
//! the two in step.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::format::timestamp;

/// Distinguishes an absent key (`None`) from an explicit `null` (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! annotation_fields {
    ($($field:ident: $ty:ty),* $(,)?) => {
        /// Findings collected by the investigator. Every field starts empty.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct AnnotationFields {
            $(pub $field: Option<$ty>,)*
        }

        /// Partial update of [`AnnotationFields`].
        ///
        /// A key missing from the payload leaves the field untouched; a key set
        /// to `null` clears it.
        #[derive(Debug, Clone, Default, PartialEq, Deserialize)]
        pub struct AnnotationPatch {
            $(
                #[serde(default, deserialize_with = "present")]
                pub $field: Option<Option<$ty>>,
            )*
        }

        impl AnnotationFields {
            /// Column names, in declaration order.
            pub const COLUMNS: &'static [&'static str] = &[$(stringify!($field)),*];

            /// Merges `patch` into `self` and returns how many fields it touched.
            pub fn apply(&mut self, patch: AnnotationPatch) -> usize {
                let mut touched = 0;
                $(
                    if let Some(value) = patch.$field {
                        self.$field = value;
                        touched += 1;
                    }
                )*
                touched
            }
        }

        impl AnnotationPatch {
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }
    };
}

annotation_fields! {
    code_resultat: String,
    elements_retrouves: String,
    flag_etat_civil_errone: String,
    date_retour: NaiveDate,

    adresse1: String,
    adresse2: String,
    adresse3: String,
    adresse4: String,
    code_postal: String,
    ville: String,
    pays_residence: String,

    telephone_personnel: String,
    telephone_chez_employeur: String,

    nom_employeur: String,
    telephone_employeur: String,
    telecopie_employeur: String,
    adresse1_employeur: String,
    adresse2_employeur: String,
    adresse3_employeur: String,
    adresse4_employeur: String,
    code_postal_employeur: String,
    ville_employeur: String,
    pays_employeur: String,

    banque_domiciliation: String,
    libelle_guichet: String,
    titulaire_compte: String,
    code_banque: String,
    code_guichet: String,

    date_deces: NaiveDate,
    numero_acte_deces: String,
    code_insee_deces: String,
    code_postal_deces: String,
    localite_deces: String,

    commentaires_revenus: String,
    montant_salaire: f64,
    periode_versement_salaire: i32,
    frequence_versement_salaire: String,
    nature_revenu1: String,
    montant_revenu1: f64,
    periode_versement_revenu1: i32,
    frequence_versement_revenu1: String,
    nature_revenu2: String,
    montant_revenu2: f64,
    periode_versement_revenu2: i32,
    frequence_versement_revenu2: String,
    nature_revenu3: String,
    montant_revenu3: f64,
    periode_versement_revenu3: i32,
    frequence_versement_revenu3: String,

    numero_facture: String,
    date_facture: NaiveDate,
    montant_facture: f64,
    tarif_applique: f64,
    cumul_montants_precedents: f64,
    reprise_facturation: f64,
    remise_eventuelle: f64,

    memo1: String,
    memo2: String,
    memo3: String,
    memo4: String,
    memo5: String,
}

/// The stored annotation for one dossier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonneeEnqueteur {
    pub id: i64,
    pub donnee_id: i64,
    #[serde(flatten)]
    pub fields: AnnotationFields,
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: NaiveDateTime,
}

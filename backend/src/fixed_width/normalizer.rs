use chrono::NaiveDate;
use common::model::donnee::DossierFields;
use log::debug;
use thiserror::Error;

use super::decoder::RawRecord;
use super::schema::field;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// How non-empty dates and amounts that cannot be read are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueMode {
    /// Store the value as absent.
    #[default]
    Lenient,
    /// Reject the line.
    Strict,
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("missing case number")]
    MissingCaseNumber,
    #[error("invalid date in {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("invalid amount in {field}: '{value}'")]
    InvalidAmount { field: &'static str, value: String },
}

/// Converts a decoded line into typed dossier fields.
///
/// The case number is the only mandatory column. Text columns pass through
/// unchanged (empty stays empty); dates are `DD/MM/YYYY` and amounts use a
/// decimal comma.
pub fn normalize(raw: &RawRecord, mode: ValueMode) -> Result<DossierFields, NormalizeError> {
    let numero_dossier = raw.get(field::NUMERO_DOSSIER).trim();
    if numero_dossier.is_empty() {
        return Err(NormalizeError::MissingCaseNumber);
    }

    let values = Values { raw, mode };
    Ok(DossierFields {
        numero_dossier: numero_dossier.to_string(),
        reference_dossier: values.text(field::REFERENCE_DOSSIER),
        numero_interlocuteur: values.text(field::NUMERO_INTERLOCUTEUR),
        guid_interlocuteur: values.text(field::GUID_INTERLOCUTEUR),
        type_demande: values.text(field::TYPE_DEMANDE),
        numero_demande: values.text(field::NUMERO_DEMANDE),
        numero_demande_contestee: values.text(field::NUMERO_DEMANDE_CONTESTEE),
        numero_demande_initiale: values.text(field::NUMERO_DEMANDE_INITIALE),
        forfait_demande: values.text(field::FORFAIT_DEMANDE),
        date_retour_espere: values.date(field::DATE_RETOUR_ESPERE)?,
        qualite: values.text(field::QUALITE),
        nom: values.text(field::NOM),
        prenom: values.text(field::PRENOM),
        date_naissance: values.date(field::DATE_NAISSANCE)?,
        lieu_naissance: values.text(field::LIEU_NAISSANCE),
        code_postal_naissance: values.text(field::CODE_POSTAL_NAISSANCE),
        pays_naissance: values.text(field::PAYS_NAISSANCE),
        nom_patronymique: values.text(field::NOM_PATRONYMIQUE),
        adresse1: values.text(field::ADRESSE1),
        adresse2: values.text(field::ADRESSE2),
        adresse3: values.text(field::ADRESSE3),
        adresse4: values.text(field::ADRESSE4),
        ville: values.text(field::VILLE),
        code_postal: values.text(field::CODE_POSTAL),
        pays_residence: values.text(field::PAYS_RESIDENCE),
        telephone_personnel: values.text(field::TELEPHONE_PERSONNEL),
        telephone_employeur: values.text(field::TELEPHONE_EMPLOYEUR),
        telecopie_employeur: values.text(field::TELECOPIE_EMPLOYEUR),
        nom_employeur: values.text(field::NOM_EMPLOYEUR),
        banque_domiciliation: values.text(field::BANQUE_DOMICILIATION),
        libelle_guichet: values.text(field::LIBELLE_GUICHET),
        titulaire_compte: values.text(field::TITULAIRE_COMPTE),
        code_banque: values.text(field::CODE_BANQUE),
        code_guichet: values.text(field::CODE_GUICHET),
        numero_compte: values.text(field::NUMERO_COMPTE),
        rib_compte: values.text(field::RIB_COMPTE),
        date_envoi: values.date(field::DATE_ENVOI)?,
        element_demandes: values.text(field::ELEMENT_DEMANDES),
        element_obligatoires: values.text(field::ELEMENT_OBLIGATOIRES),
        element_contestes: values.text(field::ELEMENT_CONTESTES),
        code_motif: values.text(field::CODE_MOTIF),
        motif_de_contestation: values.text(field::MOTIF_DE_CONTESTATION),
        cumul_montants_precedents: values.amount(field::CUMUL_MONTANTS_PRECEDENTS)?,
        code_societe: values.text(field::CODE_SOCIETE),
        urgence: values.text(field::URGENCE),
        commentaire: values.text(field::COMMENTAIRE),
    })
}

/// Parses a `DD/MM/YYYY` date. Empty text and impossible dates give `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parses an amount written with a decimal comma (`1234,56`).
/// Empty text, garbage and non-finite numbers give `None`.
pub fn parse_amount(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

struct Values<'a> {
    raw: &'a RawRecord,
    mode: ValueMode,
}

impl Values<'_> {
    fn text(&self, name: &'static str) -> String {
        self.raw.get(name).to_string()
    }

    fn date(&self, name: &'static str) -> Result<Option<NaiveDate>, NormalizeError> {
        let value = self.raw.get(name);
        match parse_date(value) {
            None if self.rejects(value) => Err(NormalizeError::InvalidDate {
                field: name,
                value: value.to_string(),
            }),
            None if !value.trim().is_empty() => {
                debug!("Ignoring unreadable date in {}: '{}'", name, value);
                Ok(None)
            }
            parsed => Ok(parsed),
        }
    }

    fn amount(&self, name: &'static str) -> Result<Option<f64>, NormalizeError> {
        let value = self.raw.get(name);
        match parse_amount(value) {
            None if self.rejects(value) => Err(NormalizeError::InvalidAmount {
                field: name,
                value: value.to_string(),
            }),
            None if !value.trim().is_empty() => {
                debug!("Ignoring unreadable amount in {}: '{}'", name, value);
                Ok(None)
            }
            parsed => Ok(parsed),
        }
    }

    fn rejects(&self, value: &str) -> bool {
        self.mode == ValueMode::Strict && !value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed_width::decoder::decode_line;
    use crate::fixed_width::fixtures::dossier_line;
    use crate::fixed_width::schema::DOSSIER_LAYOUT;

    fn raw(values: &[(&str, &str)]) -> RawRecord {
        decode_line(&dossier_line(values), DOSSIER_LAYOUT).unwrap()
    }

    #[test]
    fn parses_french_dates() {
        assert_eq!(parse_date("05/03/2024"), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("2024-03-05"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parses_decimal_comma_amounts() {
        assert_eq!(parse_amount("1234,56"), Some(1234.56));
        assert_eq!(parse_amount("12.5"), Some(12.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn missing_case_number_rejects_the_record() {
        let record = raw(&[(field::NOM, "MARTIN")]);
        assert_eq!(
            normalize(&record, ValueMode::Lenient),
            Err(NormalizeError::MissingCaseNumber)
        );
    }

    #[test]
    fn every_column_reaches_its_typed_field() {
        let record = raw(&[
            (field::NUMERO_DOSSIER, "D000000001"),
            (field::REFERENCE_DOSSIER, "REF-1"),
            (field::NUMERO_INTERLOCUTEUR, "INT-1"),
            (field::GUID_INTERLOCUTEUR, "6f9619ff-8b86-d011-b42d-00cf4fc964ff"),
            (field::TYPE_DEMANDE, "ENQ"),
            (field::NUMERO_DEMANDE, "DEM-1"),
            (field::NUMERO_DEMANDE_CONTESTEE, "DEM-C"),
            (field::NUMERO_DEMANDE_INITIALE, "DEM-I"),
            (field::FORFAIT_DEMANDE, "FORFAIT"),
            (field::DATE_RETOUR_ESPERE, "15/04/2024"),
            (field::QUALITE, "M"),
            (field::NOM, "MARTIN"),
            (field::PRENOM, "PAUL"),
            (field::DATE_NAISSANCE, "01/02/1970"),
            (field::LIEU_NAISSANCE, "LILLE"),
            (field::CODE_POSTAL_NAISSANCE, "59000"),
            (field::PAYS_NAISSANCE, "FRANCE"),
            (field::NOM_PATRONYMIQUE, "DURAND"),
            (field::ADRESSE1, "APT 3"),
            (field::ADRESSE2, "BAT B"),
            (field::ADRESSE3, "12 RUE DES LILAS"),
            (field::ADRESSE4, "LIEU-DIT"),
            (field::VILLE, "LYON"),
            (field::CODE_POSTAL, "69001"),
            (field::PAYS_RESIDENCE, "FRANCE"),
            (field::TELEPHONE_PERSONNEL, "0600000000"),
            (field::TELEPHONE_EMPLOYEUR, "0400000000"),
            (field::TELECOPIE_EMPLOYEUR, "0400000001"),
            (field::NOM_EMPLOYEUR, "ACME"),
            (field::BANQUE_DOMICILIATION, "BANQUE"),
            (field::LIBELLE_GUICHET, "GUICHET"),
            (field::TITULAIRE_COMPTE, "P MARTIN"),
            (field::CODE_BANQUE, "30002"),
            (field::CODE_GUICHET, "00550"),
            (field::NUMERO_COMPTE, "0000157841Z"),
            (field::RIB_COMPTE, "25"),
            (field::DATE_ENVOI, "01/03/2024"),
            (field::ELEMENT_DEMANDES, "AT"),
            (field::ELEMENT_OBLIGATOIRES, "A"),
            (field::ELEMENT_CONTESTES, "T"),
            (field::CODE_MOTIF, "MOTIF"),
            (field::MOTIF_DE_CONTESTATION, "ADRESSE ERRONEE"),
            (field::CUMUL_MONTANTS_PRECEDENTS, "1234,56"),
            (field::CODE_SOCIETE, "01"),
            (field::URGENCE, "U"),
            (field::COMMENTAIRE, "A rappeler"),
        ]);

        let fields = normalize(&record, ValueMode::Strict).unwrap();
        assert_eq!(fields.numero_dossier, "D000000001");
        assert_eq!(fields.reference_dossier, "REF-1");
        assert_eq!(fields.numero_interlocuteur, "INT-1");
        assert_eq!(fields.guid_interlocuteur, "6f9619ff-8b86-d011-b42d-00cf4fc964ff");
        assert_eq!(fields.type_demande, "ENQ");
        assert_eq!(fields.numero_demande, "DEM-1");
        assert_eq!(fields.numero_demande_contestee, "DEM-C");
        assert_eq!(fields.numero_demande_initiale, "DEM-I");
        assert_eq!(fields.forfait_demande, "FORFAIT");
        assert_eq!(fields.date_retour_espere, NaiveDate::from_ymd_opt(2024, 4, 15));
        assert_eq!(fields.qualite, "M");
        assert_eq!(fields.nom, "MARTIN");
        assert_eq!(fields.prenom, "PAUL");
        assert_eq!(fields.date_naissance, NaiveDate::from_ymd_opt(1970, 2, 1));
        assert_eq!(fields.lieu_naissance, "LILLE");
        assert_eq!(fields.code_postal_naissance, "59000");
        assert_eq!(fields.pays_naissance, "FRANCE");
        assert_eq!(fields.nom_patronymique, "DURAND");
        assert_eq!(fields.adresse1, "APT 3");
        assert_eq!(fields.adresse2, "BAT B");
        assert_eq!(fields.adresse3, "12 RUE DES LILAS");
        assert_eq!(fields.adresse4, "LIEU-DIT");
        assert_eq!(fields.ville, "LYON");
        assert_eq!(fields.code_postal, "69001");
        assert_eq!(fields.pays_residence, "FRANCE");
        assert_eq!(fields.telephone_personnel, "0600000000");
        assert_eq!(fields.telephone_employeur, "0400000000");
        assert_eq!(fields.telecopie_employeur, "0400000001");
        assert_eq!(fields.nom_employeur, "ACME");
        assert_eq!(fields.banque_domiciliation, "BANQUE");
        assert_eq!(fields.libelle_guichet, "GUICHET");
        assert_eq!(fields.titulaire_compte, "P MARTIN");
        assert_eq!(fields.code_banque, "30002");
        assert_eq!(fields.code_guichet, "00550");
        assert_eq!(fields.numero_compte, "0000157841Z");
        assert_eq!(fields.rib_compte, "25");
        assert_eq!(fields.date_envoi, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(fields.element_demandes, "AT");
        assert_eq!(fields.element_obligatoires, "A");
        assert_eq!(fields.element_contestes, "T");
        assert_eq!(fields.code_motif, "MOTIF");
        assert_eq!(fields.motif_de_contestation, "ADRESSE ERRONEE");
        assert_eq!(fields.cumul_montants_precedents, Some(1234.56));
        assert_eq!(fields.code_societe, "01");
        assert_eq!(fields.urgence, "U");
        assert_eq!(fields.commentaire, "A rappeler");
    }

    #[test]
    fn empty_text_stays_empty_and_empty_values_are_absent() {
        let record = raw(&[(field::NUMERO_DOSSIER, "D000000002")]);
        let fields = normalize(&record, ValueMode::Strict).unwrap();
        assert_eq!(fields.nom, "");
        assert_eq!(fields.commentaire, "");
        assert_eq!(fields.date_naissance, None);
        assert_eq!(fields.cumul_montants_precedents, None);
    }

    #[test]
    fn lenient_mode_drops_unreadable_values() {
        let record = raw(&[
            (field::NUMERO_DOSSIER, "D000000003"),
            (field::DATE_NAISSANCE, "31/02/1970"),
            (field::CUMUL_MONTANTS_PRECEDENTS, "abc"),
        ]);
        let fields = normalize(&record, ValueMode::Lenient).unwrap();
        assert_eq!(fields.date_naissance, None);
        assert_eq!(fields.cumul_montants_precedents, None);
    }

    #[test]
    fn strict_mode_rejects_unreadable_values() {
        let bad_date = raw(&[
            (field::NUMERO_DOSSIER, "D000000004"),
            (field::DATE_NAISSANCE, "31/02/1970"),
        ]);
        assert_eq!(
            normalize(&bad_date, ValueMode::Strict),
            Err(NormalizeError::InvalidDate {
                field: field::DATE_NAISSANCE,
                value: "31/02/1970".to_string()
            })
        );

        let bad_amount = raw(&[
            (field::NUMERO_DOSSIER, "D000000005"),
            (field::CUMUL_MONTANTS_PRECEDENTS, "12x4"),
        ]);
        assert_eq!(
            normalize(&bad_amount, ValueMode::Strict),
            Err(NormalizeError::InvalidAmount {
                field: field::CUMUL_MONTANTS_PRECEDENTS,
                value: "12x4".to_string()
            })
        );
    }
}

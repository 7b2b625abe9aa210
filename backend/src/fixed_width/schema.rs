//! Column positions of a dossier line.
//!
//! Positions are half-open `[start, end)` ranges counted in characters of the
//! decoded line. The supplier files are single-byte encoded, so these are the
//! byte offsets agreed with the supplier: changing one breaks decoding of
//! every file they send.

use thiserror::Error;

/// One named column of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub end: usize,
}

impl FieldSpec {
    pub const fn new(name: &'static str, start: usize, end: usize) -> Self {
        Self { name, start, end }
    }

    pub const fn width(&self) -> usize {
        self.end - self.start
    }
}

/// Column names as they appear in the supplier documentation.
pub mod field {
    pub const NUMERO_DOSSIER: &str = "numeroDossier";
    pub const REFERENCE_DOSSIER: &str = "referenceDossier";
    pub const NUMERO_INTERLOCUTEUR: &str = "numeroInterlocuteur";
    pub const GUID_INTERLOCUTEUR: &str = "guidInterlocuteur";
    pub const TYPE_DEMANDE: &str = "typeDemande";
    pub const NUMERO_DEMANDE: &str = "numeroDemande";
    pub const NUMERO_DEMANDE_CONTESTEE: &str = "numeroDemandeContestee";
    pub const NUMERO_DEMANDE_INITIALE: &str = "numeroDemandeInitiale";
    pub const FORFAIT_DEMANDE: &str = "forfaitDemande";
    pub const DATE_RETOUR_ESPERE: &str = "dateRetourEspere";
    pub const QUALITE: &str = "qualite";
    pub const NOM: &str = "nom";
    pub const PRENOM: &str = "prenom";
    pub const DATE_NAISSANCE: &str = "dateNaissance";
    pub const LIEU_NAISSANCE: &str = "lieuNaissance";
    pub const CODE_POSTAL_NAISSANCE: &str = "codePostalDeNaissance";
    pub const PAYS_NAISSANCE: &str = "paysNaissance";
    pub const NOM_PATRONYMIQUE: &str = "nomPatronymique";
    pub const ADRESSE1: &str = "adresse1";
    pub const ADRESSE2: &str = "adresse2";
    pub const ADRESSE3: &str = "adresse3";
    pub const ADRESSE4: &str = "adresse4";
    pub const VILLE: &str = "ville";
    pub const CODE_POSTAL: &str = "codePostal";
    pub const PAYS_RESIDENCE: &str = "paysResidence";
    pub const TELEPHONE_PERSONNEL: &str = "telephonePersonnel";
    pub const TELEPHONE_EMPLOYEUR: &str = "telephoneEmployeur";
    pub const TELECOPIE_EMPLOYEUR: &str = "telecopieEmployeur";
    pub const NOM_EMPLOYEUR: &str = "nomEmployeur";
    pub const BANQUE_DOMICILIATION: &str = "banqueDomiciliation";
    pub const LIBELLE_GUICHET: &str = "libelleGuichet";
    pub const TITULAIRE_COMPTE: &str = "titulaireCompte";
    pub const CODE_BANQUE: &str = "codeBanque";
    pub const CODE_GUICHET: &str = "codeGuichet";
    pub const NUMERO_COMPTE: &str = "numeroCompte";
    pub const RIB_COMPTE: &str = "ribCompte";
    pub const DATE_ENVOI: &str = "datedenvoie";
    pub const ELEMENT_DEMANDES: &str = "elementDemandes";
    pub const ELEMENT_OBLIGATOIRES: &str = "elementObligatoires";
    pub const ELEMENT_CONTESTES: &str = "elementContestes";
    pub const CODE_MOTIF: &str = "codeMotif";
    pub const MOTIF_DE_CONTESTATION: &str = "motifDeContestation";
    pub const CUMUL_MONTANTS_PRECEDENTS: &str = "CumulMontantsPrecedents";
    pub const CODE_SOCIETE: &str = "codeSociete";
    pub const URGENCE: &str = "urgence";
    pub const COMMENTAIRE: &str = "commentaire";
}

use field::*;

pub const DOSSIER_LAYOUT: &[FieldSpec] = &[
    FieldSpec::new(NUMERO_DOSSIER, 0, 10),
    FieldSpec::new(REFERENCE_DOSSIER, 10, 25),
    FieldSpec::new(NUMERO_INTERLOCUTEUR, 25, 37),
    FieldSpec::new(GUID_INTERLOCUTEUR, 37, 73),
    FieldSpec::new(TYPE_DEMANDE, 73, 76),
    FieldSpec::new(NUMERO_DEMANDE, 76, 87),
    FieldSpec::new(NUMERO_DEMANDE_CONTESTEE, 87, 98),
    FieldSpec::new(NUMERO_DEMANDE_INITIALE, 98, 109),
    FieldSpec::new(FORFAIT_DEMANDE, 109, 125),
    FieldSpec::new(DATE_RETOUR_ESPERE, 125, 135),
    FieldSpec::new(QUALITE, 135, 145),
    FieldSpec::new(NOM, 145, 175),
    FieldSpec::new(PRENOM, 175, 195),
    FieldSpec::new(DATE_NAISSANCE, 195, 205),
    FieldSpec::new(LIEU_NAISSANCE, 205, 255),
    FieldSpec::new(CODE_POSTAL_NAISSANCE, 255, 265),
    FieldSpec::new(PAYS_NAISSANCE, 265, 297),
    FieldSpec::new(NOM_PATRONYMIQUE, 297, 327),
    FieldSpec::new(ADRESSE1, 327, 359),
    FieldSpec::new(ADRESSE2, 359, 391),
    FieldSpec::new(ADRESSE3, 391, 423),
    FieldSpec::new(ADRESSE4, 423, 455),
    FieldSpec::new(VILLE, 455, 487),
    FieldSpec::new(CODE_POSTAL, 487, 497),
    FieldSpec::new(PAYS_RESIDENCE, 497, 529),
    FieldSpec::new(TELEPHONE_PERSONNEL, 529, 544),
    FieldSpec::new(TELEPHONE_EMPLOYEUR, 544, 559),
    FieldSpec::new(TELECOPIE_EMPLOYEUR, 559, 574),
    FieldSpec::new(NOM_EMPLOYEUR, 574, 606),
    FieldSpec::new(BANQUE_DOMICILIATION, 606, 638),
    FieldSpec::new(LIBELLE_GUICHET, 638, 668),
    FieldSpec::new(TITULAIRE_COMPTE, 668, 700),
    FieldSpec::new(CODE_BANQUE, 700, 705),
    FieldSpec::new(CODE_GUICHET, 705, 710),
    FieldSpec::new(NUMERO_COMPTE, 710, 721),
    FieldSpec::new(RIB_COMPTE, 721, 723),
    FieldSpec::new(DATE_ENVOI, 723, 733),
    FieldSpec::new(ELEMENT_DEMANDES, 733, 743),
    FieldSpec::new(ELEMENT_OBLIGATOIRES, 743, 753),
    FieldSpec::new(ELEMENT_CONTESTES, 753, 763),
    FieldSpec::new(CODE_MOTIF, 763, 779),
    FieldSpec::new(MOTIF_DE_CONTESTATION, 779, 843),
    FieldSpec::new(CUMUL_MONTANTS_PRECEDENTS, 843, 851),
    FieldSpec::new(CODE_SOCIETE, 851, 853),
    FieldSpec::new(URGENCE, 853, 854),
    FieldSpec::new(COMMENTAIRE, 854, 1854),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("field '{name}' has an empty or inverted range {start}..{end}")]
    EmptyRange {
        name: &'static str,
        start: usize,
        end: usize,
    },
    #[error("field '{name}' starts at {start}, before the previous field ends at {previous_end}")]
    Overlap {
        name: &'static str,
        start: usize,
        previous_end: usize,
    },
    #[error("field '{name}' is declared twice")]
    DuplicateName { name: &'static str },
}

/// Checks that every range is non-empty and that ranges are increasing and
/// disjoint. Gaps between fields are allowed.
pub fn check_layout(layout: &[FieldSpec]) -> Result<(), LayoutError> {
    let mut previous_end = 0;
    for (index, spec) in layout.iter().enumerate() {
        if spec.start >= spec.end {
            return Err(LayoutError::EmptyRange {
                name: spec.name,
                start: spec.start,
                end: spec.end,
            });
        }
        if spec.start < previous_end {
            return Err(LayoutError::Overlap {
                name: spec.name,
                start: spec.start,
                previous_end,
            });
        }
        if layout[..index].iter().any(|other| other.name == spec.name) {
            return Err(LayoutError::DuplicateName { name: spec.name });
        }
        previous_end = spec.end;
    }
    Ok(())
}

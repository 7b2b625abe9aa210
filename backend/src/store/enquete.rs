use common::model::enquete::{AnnotationFields, AnnotationPatch, DonneeEnqueteur};
use rusqlite::{params, types::ToSql, Connection, OptionalExtension, Row};

use super::now;

/// Creates the empty annotation that accompanies a freshly imported dossier.
pub fn insert_blank(conn: &Connection, donnee_id: i64) -> rusqlite::Result<i64> {
    let at = now();
    conn.execute(
        "INSERT INTO donnees_enqueteur (donnee_id, created_at, updated_at) VALUES (?1, ?2, ?3)",
        params![donnee_id, at, at],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_donnee(
    conn: &Connection,
    donnee_id: i64,
) -> rusqlite::Result<Option<DonneeEnqueteur>> {
    conn.query_row(
        "SELECT * FROM donnees_enqueteur WHERE donnee_id = ?1",
        [donnee_id],
        from_row,
    )
    .optional()
}

/// Applies `patch` to the annotation of `donnee_id`, creating it first when
/// the dossier has none. `updated_at` moves on every call.
///
/// The caller checks that the dossier exists.
pub fn upsert_patch(
    conn: &Connection,
    donnee_id: i64,
    patch: AnnotationPatch,
) -> rusqlite::Result<DonneeEnqueteur> {
    let mut current = match find_by_donnee(conn, donnee_id)? {
        Some(current) => current,
        None => {
            insert_blank(conn, donnee_id)?;
            find_by_donnee(conn, donnee_id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?
        }
    };
    current.fields.apply(patch);
    current.updated_at = now();

    let assignments = AnnotationFields::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let n = AnnotationFields::COLUMNS.len();
    let sql = format!(
        "UPDATE donnees_enqueteur SET {assignments}, updated_at = ?{} WHERE id = ?{}",
        n + 1,
        n + 2
    );

    {
        let mut values = bind_values(&current.fields);
        values.push(&current.updated_at);
        values.push(&current.id);
        conn.execute(&sql, values.as_slice())?;
    }
    Ok(current)
}

/// Bind values in `AnnotationFields::COLUMNS` order.
fn bind_values(a: &AnnotationFields) -> Vec<&dyn ToSql> {
    vec![
        &a.code_resultat as &dyn ToSql,
        &a.elements_retrouves as &dyn ToSql,
        &a.flag_etat_civil_errone as &dyn ToSql,
        &a.date_retour as &dyn ToSql,
        &a.adresse1 as &dyn ToSql,
        &a.adresse2 as &dyn ToSql,
        &a.adresse3 as &dyn ToSql,
        &a.adresse4 as &dyn ToSql,
        &a.code_postal as &dyn ToSql,
        &a.ville as &dyn ToSql,
        &a.pays_residence as &dyn ToSql,
        &a.telephone_personnel as &dyn ToSql,
        &a.telephone_chez_employeur as &dyn ToSql,
        &a.nom_employeur as &dyn ToSql,
        &a.telephone_employeur as &dyn ToSql,
        &a.telecopie_employeur as &dyn ToSql,
        &a.adresse1_employeur as &dyn ToSql,
        &a.adresse2_employeur as &dyn ToSql,
        &a.adresse3_employeur as &dyn ToSql,
        &a.adresse4_employeur as &dyn ToSql,
        &a.code_postal_employeur as &dyn ToSql,
        &a.ville_employeur as &dyn ToSql,
        &a.pays_employeur as &dyn ToSql,
        &a.banque_domiciliation as &dyn ToSql,
        &a.libelle_guichet as &dyn ToSql,
        &a.titulaire_compte as &dyn ToSql,
        &a.code_banque as &dyn ToSql,
        &a.code_guichet as &dyn ToSql,
        &a.date_deces as &dyn ToSql,
        &a.numero_acte_deces as &dyn ToSql,
        &a.code_insee_deces as &dyn ToSql,
        &a.code_postal_deces as &dyn ToSql,
        &a.localite_deces as &dyn ToSql,
        &a.commentaires_revenus as &dyn ToSql,
        &a.montant_salaire as &dyn ToSql,
        &a.periode_versement_salaire as &dyn ToSql,
        &a.frequence_versement_salaire as &dyn ToSql,
        &a.nature_revenu1 as &dyn ToSql,
        &a.montant_revenu1 as &dyn ToSql,
        &a.periode_versement_revenu1 as &dyn ToSql,
        &a.frequence_versement_revenu1 as &dyn ToSql,
        &a.nature_revenu2 as &dyn ToSql,
        &a.montant_revenu2 as &dyn ToSql,
        &a.periode_versement_revenu2 as &dyn ToSql,
        &a.frequence_versement_revenu2 as &dyn ToSql,
        &a.nature_revenu3 as &dyn ToSql,
        &a.montant_revenu3 as &dyn ToSql,
        &a.periode_versement_revenu3 as &dyn ToSql,
        &a.frequence_versement_revenu3 as &dyn ToSql,
        &a.numero_facture as &dyn ToSql,
        &a.date_facture as &dyn ToSql,
        &a.montant_facture as &dyn ToSql,
        &a.tarif_applique as &dyn ToSql,
        &a.cumul_montants_precedents as &dyn ToSql,
        &a.reprise_facturation as &dyn ToSql,
        &a.remise_eventuelle as &dyn ToSql,
        &a.memo1 as &dyn ToSql,
        &a.memo2 as &dyn ToSql,
        &a.memo3 as &dyn ToSql,
        &a.memo4 as &dyn ToSql,
        &a.memo5 as &dyn ToSql,
    ]
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<DonneeEnqueteur> {
    let fields = AnnotationFields {
        code_resultat: row.get("code_resultat")?,
        elements_retrouves: row.get("elements_retrouves")?,
        flag_etat_civil_errone: row.get("flag_etat_civil_errone")?,
        date_retour: row.get("date_retour")?,
        adresse1: row.get("adresse1")?,
        adresse2: row.get("adresse2")?,
        adresse3: row.get("adresse3")?,
        adresse4: row.get("adresse4")?,
        code_postal: row.get("code_postal")?,
        ville: row.get("ville")?,
        pays_residence: row.get("pays_residence")?,
        telephone_personnel: row.get("telephone_personnel")?,
        telephone_chez_employeur: row.get("telephone_chez_employeur")?,
        nom_employeur: row.get("nom_employeur")?,
        telephone_employeur: row.get("telephone_employeur")?,
        telecopie_employeur: row.get("telecopie_employeur")?,
        adresse1_employeur: row.get("adresse1_employeur")?,
        adresse2_employeur: row.get("adresse2_employeur")?,
        adresse3_employeur: row.get("adresse3_employeur")?,
        adresse4_employeur: row.get("adresse4_employeur")?,
        code_postal_employeur: row.get("code_postal_employeur")?,
        ville_employeur: row.get("ville_employeur")?,
        pays_employeur: row.get("pays_employeur")?,
        banque_domiciliation: row.get("banque_domiciliation")?,
        libelle_guichet: row.get("libelle_guichet")?,
        titulaire_compte: row.get("titulaire_compte")?,
        code_banque: row.get("code_banque")?,
        code_guichet: row.get("code_guichet")?,
        date_deces: row.get("date_deces")?,
        numero_acte_deces: row.get("numero_acte_deces")?,
        code_insee_deces: row.get("code_insee_deces")?,
        code_postal_deces: row.get("code_postal_deces")?,
        localite_deces: row.get("localite_deces")?,
        commentaires_revenus: row.get("commentaires_revenus")?,
        montant_salaire: row.get("montant_salaire")?,
        periode_versement_salaire: row.get("periode_versement_salaire")?,
        frequence_versement_salaire: row.get("frequence_versement_salaire")?,
        nature_revenu1: row.get("nature_revenu1")?,
        montant_revenu1: row.get("montant_revenu1")?,
        periode_versement_revenu1: row.get("periode_versement_revenu1")?,
        frequence_versement_revenu1: row.get("frequence_versement_revenu1")?,
        nature_revenu2: row.get("nature_revenu2")?,
        montant_revenu2: row.get("montant_revenu2")?,
        periode_versement_revenu2: row.get("periode_versement_revenu2")?,
        frequence_versement_revenu2: row.get("frequence_versement_revenu2")?,
        nature_revenu3: row.get("nature_revenu3")?,
        montant_revenu3: row.get("montant_revenu3")?,
        periode_versement_revenu3: row.get("periode_versement_revenu3")?,
        frequence_versement_revenu3: row.get("frequence_versement_revenu3")?,
        numero_facture: row.get("numero_facture")?,
        date_facture: row.get("date_facture")?,
        montant_facture: row.get("montant_facture")?,
        tarif_applique: row.get("tarif_applique")?,
        cumul_montants_precedents: row.get("cumul_montants_precedents")?,
        reprise_facturation: row.get("reprise_facturation")?,
        remise_eventuelle: row.get("remise_eventuelle")?,
        memo1: row.get("memo1")?,
        memo2: row.get("memo2")?,
        memo3: row.get("memo3")?,
        memo4: row.get("memo4")?,
        memo5: row.get("memo5")?,
    };
    Ok(DonneeEnqueteur {
        id: row.get("id")?,
        donnee_id: row.get("donnee_id")?,
        fields,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{donnees, fichiers, open_in_memory};
    use chrono::NaiveDate;
    use common::model::donnee::DossierFields;

    fn donnee(conn: &Connection) -> i64 {
        let fichier = fichiers::insert(conn, "lot.ost", None).unwrap();
        let fields = DossierFields {
            numero_dossier: "D1".to_string(),
            ..Default::default()
        };
        donnees::insert(conn, fichier, &fields).unwrap()
    }

    fn patch(json: serde_json::Value) -> AnnotationPatch {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn blank_annotation_has_no_findings() {
        let conn = open_in_memory().unwrap();
        let id = donnee(&conn);
        insert_blank(&conn, id).unwrap();

        let annotation = find_by_donnee(&conn, id).unwrap().unwrap();
        assert_eq!(annotation.donnee_id, id);
        assert_eq!(annotation.fields, AnnotationFields::default());
    }

    #[test]
    fn second_annotation_for_a_dossier_is_refused() {
        let conn = open_in_memory().unwrap();
        let id = donnee(&conn);
        insert_blank(&conn, id).unwrap();
        let err = insert_blank(&conn, id).unwrap_err();
        assert!(crate::store::is_unique_violation(&err));
    }

    #[test]
    fn patch_updates_present_keys_and_clears_nulls() {
        let conn = open_in_memory().unwrap();
        let id = donnee(&conn);

        let first = upsert_patch(
            &conn,
            id,
            patch(serde_json::json!({
                "code_resultat": "P",
                "date_retour": "2024-03-15",
                "montant_salaire": 1850.5,
                "periode_versement_salaire": 12,
                "memo5": "vu sur place"
            })),
        )
        .unwrap();
        assert_eq!(first.fields.code_resultat.as_deref(), Some("P"));

        let second = upsert_patch(
            &conn,
            id,
            patch(serde_json::json!({ "memo5": null, "ville": "NANTES" })),
        )
        .unwrap();
        assert!(second.updated_at >= first.updated_at);

        let stored = find_by_donnee(&conn, id).unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.fields.code_resultat.as_deref(), Some("P"));
        assert_eq!(stored.fields.date_retour, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(stored.fields.montant_salaire, Some(1850.5));
        assert_eq!(stored.fields.periode_versement_salaire, Some(12));
        assert_eq!(stored.fields.ville.as_deref(), Some("NANTES"));
        assert_eq!(stored.fields.memo5, None);
    }
}

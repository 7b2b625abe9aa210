use common::model::donnee::{Donnee, DossierFields};
use common::requests::DonneeQuery;
use rusqlite::{named_params, params, Connection, OptionalExtension, Row};

use super::now;

const SELECT_DONNEE: &str = "SELECT * FROM donnees";

const INSERT_DONNEE: &str = "INSERT INTO donnees (
    fichier_id, numero_dossier, reference_dossier, numero_interlocuteur,
    guid_interlocuteur, type_demande, numero_demande, numero_demande_contestee,
    numero_demande_initiale, forfait_demande, date_retour_espere, qualite, nom,
    prenom, date_naissance, lieu_naissance, code_postal_naissance, pays_naissance,
    nom_patronymique, adresse1, adresse2, adresse3, adresse4, ville, code_postal,
    pays_residence, telephone_personnel, telephone_employeur, telecopie_employeur,
    nom_employeur, banque_domiciliation, libelle_guichet, titulaire_compte,
    code_banque, code_guichet, numero_compte, rib_compte, date_envoi,
    element_demandes, element_obligatoires, element_contestes, code_motif,
    motif_de_contestation, cumul_montants_precedents, code_societe, urgence,
    commentaire, created_at, updated_at
) VALUES (
    :fichier_id, :numero_dossier, :reference_dossier, :numero_interlocuteur,
    :guid_interlocuteur, :type_demande, :numero_demande, :numero_demande_contestee,
    :numero_demande_initiale, :forfait_demande, :date_retour_espere, :qualite, :nom,
    :prenom, :date_naissance, :lieu_naissance, :code_postal_naissance, :pays_naissance,
    :nom_patronymique, :adresse1, :adresse2, :adresse3, :adresse4, :ville, :code_postal,
    :pays_residence, :telephone_personnel, :telephone_employeur, :telecopie_employeur,
    :nom_employeur, :banque_domiciliation, :libelle_guichet, :titulaire_compte,
    :code_banque, :code_guichet, :numero_compte, :rib_compte, :date_envoi,
    :element_demandes, :element_obligatoires, :element_contestes, :code_motif,
    :motif_de_contestation, :cumul_montants_precedents, :code_societe, :urgence,
    :commentaire, :created_at, :updated_at
)";

/// Stores one dossier under `fichier_id` and returns its id.
pub fn insert(conn: &Connection, fichier_id: i64, f: &DossierFields) -> rusqlite::Result<i64> {
    let at = now();
    conn.execute(
        INSERT_DONNEE,
        named_params! {
            ":fichier_id": fichier_id,
            ":numero_dossier": f.numero_dossier,
            ":reference_dossier": f.reference_dossier,
            ":numero_interlocuteur": f.numero_interlocuteur,
            ":guid_interlocuteur": f.guid_interlocuteur,
            ":type_demande": f.type_demande,
            ":numero_demande": f.numero_demande,
            ":numero_demande_contestee": f.numero_demande_contestee,
            ":numero_demande_initiale": f.numero_demande_initiale,
            ":forfait_demande": f.forfait_demande,
            ":date_retour_espere": f.date_retour_espere,
            ":qualite": f.qualite,
            ":nom": f.nom,
            ":prenom": f.prenom,
            ":date_naissance": f.date_naissance,
            ":lieu_naissance": f.lieu_naissance,
            ":code_postal_naissance": f.code_postal_naissance,
            ":pays_naissance": f.pays_naissance,
            ":nom_patronymique": f.nom_patronymique,
            ":adresse1": f.adresse1,
            ":adresse2": f.adresse2,
            ":adresse3": f.adresse3,
            ":adresse4": f.adresse4,
            ":ville": f.ville,
            ":code_postal": f.code_postal,
            ":pays_residence": f.pays_residence,
            ":telephone_personnel": f.telephone_personnel,
            ":telephone_employeur": f.telephone_employeur,
            ":telecopie_employeur": f.telecopie_employeur,
            ":nom_employeur": f.nom_employeur,
            ":banque_domiciliation": f.banque_domiciliation,
            ":libelle_guichet": f.libelle_guichet,
            ":titulaire_compte": f.titulaire_compte,
            ":code_banque": f.code_banque,
            ":code_guichet": f.code_guichet,
            ":numero_compte": f.numero_compte,
            ":rib_compte": f.rib_compte,
            ":date_envoi": f.date_envoi,
            ":element_demandes": f.element_demandes,
            ":element_obligatoires": f.element_obligatoires,
            ":element_contestes": f.element_contestes,
            ":code_motif": f.code_motif,
            ":motif_de_contestation": f.motif_de_contestation,
            ":cumul_montants_precedents": f.cumul_montants_precedents,
            ":code_societe": f.code_societe,
            ":urgence": f.urgence,
            ":commentaire": f.commentaire,
            ":created_at": at,
            ":updated_at": at,
        },
    )?;
    Ok(conn.last_insert_rowid())
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Donnee> {
    let fields = DossierFields {
        numero_dossier: row.get("numero_dossier")?,
        reference_dossier: row.get("reference_dossier")?,
        numero_interlocuteur: row.get("numero_interlocuteur")?,
        guid_interlocuteur: row.get("guid_interlocuteur")?,
        type_demande: row.get("type_demande")?,
        numero_demande: row.get("numero_demande")?,
        numero_demande_contestee: row.get("numero_demande_contestee")?,
        numero_demande_initiale: row.get("numero_demande_initiale")?,
        forfait_demande: row.get("forfait_demande")?,
        date_retour_espere: row.get("date_retour_espere")?,
        qualite: row.get("qualite")?,
        nom: row.get("nom")?,
        prenom: row.get("prenom")?,
        date_naissance: row.get("date_naissance")?,
        lieu_naissance: row.get("lieu_naissance")?,
        code_postal_naissance: row.get("code_postal_naissance")?,
        pays_naissance: row.get("pays_naissance")?,
        nom_patronymique: row.get("nom_patronymique")?,
        adresse1: row.get("adresse1")?,
        adresse2: row.get("adresse2")?,
        adresse3: row.get("adresse3")?,
        adresse4: row.get("adresse4")?,
        ville: row.get("ville")?,
        code_postal: row.get("code_postal")?,
        pays_residence: row.get("pays_residence")?,
        telephone_personnel: row.get("telephone_personnel")?,
        telephone_employeur: row.get("telephone_employeur")?,
        telecopie_employeur: row.get("telecopie_employeur")?,
        nom_employeur: row.get("nom_employeur")?,
        banque_domiciliation: row.get("banque_domiciliation")?,
        libelle_guichet: row.get("libelle_guichet")?,
        titulaire_compte: row.get("titulaire_compte")?,
        code_banque: row.get("code_banque")?,
        code_guichet: row.get("code_guichet")?,
        numero_compte: row.get("numero_compte")?,
        rib_compte: row.get("rib_compte")?,
        date_envoi: row.get("date_envoi")?,
        element_demandes: row.get("element_demandes")?,
        element_obligatoires: row.get("element_obligatoires")?,
        element_contestes: row.get("element_contestes")?,
        code_motif: row.get("code_motif")?,
        motif_de_contestation: row.get("motif_de_contestation")?,
        cumul_montants_precedents: row.get("cumul_montants_precedents")?,
        code_societe: row.get("code_societe")?,
        urgence: row.get("urgence")?,
        commentaire: row.get("commentaire")?,
    };
    Ok(Donnee {
        id: row.get("id")?,
        fichier_id: row.get("fichier_id")?,
        fields,
        enqueteur_id: row.get("enqueteur_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub fn find(conn: &Connection, id: i64) -> rusqlite::Result<Option<Donnee>> {
    conn.query_row(&format!("{SELECT_DONNEE} WHERE id = ?1"), [id], from_row)
        .optional()
}

pub fn exists(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.query_row("SELECT EXISTS(SELECT 1 FROM donnees WHERE id = ?1)", [id], |row| {
        row.get(0)
    })
}

/// Dossiers matching the optional filters, in import order.
pub fn list(conn: &Connection, query: &DonneeQuery) -> rusqlite::Result<Vec<Donnee>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_DONNEE}
         WHERE (:fichier_id IS NULL OR fichier_id = :fichier_id)
           AND (:enqueteur_id IS NULL OR enqueteur_id = :enqueteur_id)
         ORDER BY id"
    ))?;
    let rows = stmt.query_map(
        named_params! {
            ":fichier_id": query.fichier_id,
            ":enqueteur_id": query.enqueteur_id,
        },
        from_row,
    )?;
    rows.collect()
}

/// Deletes a dossier and its annotation. Returns false when it did not exist.
pub fn delete_cascade(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.execute("DELETE FROM donnees_enqueteur WHERE donnee_id = ?1", [id])?;
    Ok(conn.execute("DELETE FROM donnees WHERE id = ?1", [id])? > 0)
}

/// Sets (or clears) the investigator of the dossier whose case number is
/// `numero_dossier`. When a case number was imported more than once the
/// earliest dossier is the one assigned. Returns the dossier id, if any.
pub fn assign_enqueteur(
    conn: &Connection,
    numero_dossier: &str,
    enqueteur_id: Option<i64>,
) -> rusqlite::Result<Option<i64>> {
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM donnees WHERE numero_dossier = ?1 ORDER BY id LIMIT 1",
            [numero_dossier],
            |row| row.get(0),
        )
        .optional()?;
    if let Some(id) = id {
        conn.execute(
            "UPDATE donnees SET enqueteur_id = ?1, updated_at = ?2 WHERE id = ?3",
            params![enqueteur_id, now(), id],
        )?;
    }
    Ok(id)
}

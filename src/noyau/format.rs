// src/noyau/format.rs
//
// Affichage final : normalisation textuelle + mise en page (π formaté).

/// Largeur de ligne de `pi_formatted`.
pub const LARGEUR_LIGNE: usize = 50;

/// Supprime les zéros de queue après la virgule, puis la virgule si elle reste seule.
/// "1.2300" -> "1.23" ; "5.000" -> "5" ; "100" -> "100" (pas de virgule : inchangé).
///
/// Idempotent.
pub fn trim_trailing_zeroes(texte: &str) -> String {
    match texte.split_once('.') {
        None => texte.to_string(),
        Some((ent, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                ent.to_string()
            } else {
                format!("{ent}.{frac}")
            }
        }
    }
}

/// Découpe un texte en lignes de `largeur` caractères (dernière ligne éventuellement plus courte).
pub fn envelopper(texte: &str, largeur: usize) -> String {
    if largeur == 0 {
        return texte.to_string();
    }
    let chars: Vec<char> = texte.chars().collect();
    chars
        .chunks(largeur)
        .map(|ligne| ligne.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

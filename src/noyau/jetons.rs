// src/noyau/jetons.rs

use super::decimal::Decimal;
use super::erreur::{Erreur, Result};

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Num(Decimal),

    // Variable (la valeur n’est cherchée qu’à l’évaluation)
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret, // ^

    LPar,
    RPar,

    Fin,
}

/// Tokenize une chaîne en jetons (toujours terminée par `Tok::Fin`).
/// Supporte:
/// - nombres : chiffres avec au plus un point (12, 3.25, .5, 7.)
/// - identifiants [a-zA-Z][a-zA-Z0-9_]* (sensibles à la casse)
/// - opérateurs + - * / % ^
/// - parenthèses ( )
pub fn tokenize(s: &str) -> Result<Vec<Tok>> {
    let mut out = Vec::new();
    let chars: Vec<char> = s.chars().collect();
    let mut i: usize = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let simple = match c {
            '(' => Some(Tok::LPar),
            ')' => Some(Tok::RPar),
            '+' => Some(Tok::Plus),
            '-' => Some(Tok::Minus),
            '*' => Some(Tok::Star),
            '/' => Some(Tok::Slash),
            '%' => Some(Tok::Percent),
            '^' => Some(Tok::Caret),
            _ => None,
        };
        if let Some(tok) = simple {
            out.push(tok);
            i += 1;
            continue;
        }

        // Identifiants ASCII : lettre puis lettres/chiffres/_
        if c.is_ascii_alphabetic() {
            let start = i;
            i += 1;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            out.push(Tok::Ident(chars[start..i].iter().collect()));
            continue;
        }

        // Nombre : chiffres [ '.' chiffres ] ou '.' chiffres
        let debut_nombre =
            c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(char::is_ascii_digit));
        if debut_nombre {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            let texte: String = chars[start..i].iter().collect();
            out.push(Tok::Num(texte.parse()?));
            continue;
        }

        return Err(Erreur::Syntaxe(format!(
            "caractère inattendu: '{c}' (position {i})"
        )));
    }

    out.push(Tok::Fin);
    Ok(out)
}

/// Forme textuelle d’un jeton (messages d’erreur, traces).
pub fn format_tok(t: &Tok) -> String {
    match t {
        Tok::Num(d) => d.to_string(),
        Tok::Ident(name) => name.clone(),

        Tok::Plus => "+".to_string(),
        Tok::Minus => "-".to_string(),
        Tok::Star => "*".to_string(),
        Tok::Slash => "/".to_string(),
        Tok::Percent => "%".to_string(),
        Tok::Caret => "^".to_string(),

        Tok::LPar => "(".to_string(),
        Tok::RPar => ")".to_string(),

        Tok::Fin => "<fin>".to_string(),
    }
}

/// Liste de jetons en texte (traces).
pub fn format_tokens(tokens: &[Tok]) -> String {
    tokens.iter().map(format_tok).collect::<Vec<_>>().join(" ")
}

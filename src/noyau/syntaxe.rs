// src/noyau/syntaxe.rs
//
// Jetons -> arbre, par montée de précédence (precedence climbing).
//
// Précédences:
//   + -     : 1, gauche
//   * / %   : 2, gauche
//   -x      : 3 (unaire, préfixe)
//   ^       : 4, droite
//
// Donc: -2^2 = -(2^2) ; -2*3 = (-2)*3 ; 2^-1 = 2^(-1) ; 2^3^2 = 2^(3^2).
//
// Seules les parenthèses font descendre l’analyseur : les moins unaires et les
// chaînes de `^` sont lus en boucle, puis repliés de droite à gauche.

use tracing::trace;

use super::erreur::{Erreur, Result};
use super::expr::{Expr, OpBinaire};
use super::jetons::{format_tok, format_tokens, tokenize, Tok};

/// Garde-fou : parenthèses imbriquées au plus sur 256 niveaux.
pub const PROFONDEUR_MAX: usize = 256;

/// Opérateurs binaires gauches (le `^` est traité par `Analyseur::unaire`).
fn precedence(t: &Tok) -> Option<u8> {
    match t {
        Tok::Plus | Tok::Minus => Some(1),
        Tok::Star | Tok::Slash | Tok::Percent => Some(2),
        _ => None,
    }
}

fn op_binaire(t: &Tok) -> Option<OpBinaire> {
    match t {
        Tok::Plus => Some(OpBinaire::Plus),
        Tok::Minus => Some(OpBinaire::Moins),
        Tok::Star => Some(OpBinaire::Fois),
        Tok::Slash => Some(OpBinaire::Div),
        Tok::Percent => Some(OpBinaire::Mod),
        _ => None,
    }
}

struct Analyseur {
    jetons: Vec<Tok>,
    pos: usize,
    profondeur: usize,
}

impl Analyseur {
    fn courant(&self) -> &Tok {
        // tokenize garantit un Tok::Fin final ; on ne dépasse jamais
        self.jetons.get(self.pos).unwrap_or(&Tok::Fin)
    }

    fn avancer(&mut self) -> Tok {
        let t = self.courant().clone();
        if self.pos < self.jetons.len() {
            self.pos += 1;
        }
        t
    }

    /// expression(p) : un opérande unaire, puis les opérateurs binaires de précédence >= p.
    /// Tous gauches : la récursion sur l’opérande droit est bornée par le nombre de niveaux.
    fn expression(&mut self, prec_min: u8) -> Result<Expr> {
        let mut gauche = self.unaire()?;

        loop {
            let tok = self.courant();
            let (Some(prec), Some(op)) = (precedence(tok), op_binaire(tok)) else {
                break;
            };
            if prec < prec_min {
                break;
            }

            self.avancer();
            let droite = self.expression(prec + 1)?;
            gauche = Expr::bin(op, gauche, droite);
        }

        Ok(gauche)
    }

    /// [-]* primaire ( ^ [-]* primaire )*
    ///
    /// Un moins porte sur tout ce qui le suit dans la chaîne de `^` :
    /// `a ^ -b ^ c` = a^(-(b^c)).
    fn unaire(&mut self) -> Result<Expr> {
        let mut maillons: Vec<(usize, Expr)> = Vec::new();
        loop {
            let mut moins = 0usize;
            while matches!(self.courant(), Tok::Minus) {
                self.avancer();
                moins += 1;
            }
            maillons.push((moins, self.primaire()?));

            if !matches!(self.courant(), Tok::Caret) {
                break;
            }
            self.avancer();
        }

        let mut acc: Option<Expr> = None;
        while let Some((moins, base)) = maillons.pop() {
            let mut e = match acc.take() {
                Some(exposant) => Expr::bin(OpBinaire::Puiss, base, exposant),
                None => base,
            };
            for _ in 0..moins {
                e = Expr::neg(e);
            }
            acc = Some(e);
        }
        acc.ok_or_else(|| Erreur::Syntaxe("opérande manquant".into()))
    }

    fn primaire(&mut self) -> Result<Expr> {
        match self.avancer() {
            Tok::Num(d) => Ok(Expr::Lit(d)),
            Tok::Ident(nom) => Ok(Expr::Var(nom)),

            Tok::LPar => {
                self.profondeur += 1;
                if self.profondeur > PROFONDEUR_MAX {
                    return Err(Erreur::Syntaxe(format!(
                        "parenthèses trop imbriquées (> {PROFONDEUR_MAX} niveaux)"
                    )));
                }
                let e = self.expression(0)?;
                self.profondeur -= 1;
                match self.avancer() {
                    Tok::RPar => Ok(e),
                    _ => Err(Erreur::Syntaxe("parenthèses non fermées".into())),
                }
            }

            Tok::Fin => Err(Erreur::Syntaxe(
                "opérande manquant en fin d’expression".into(),
            )),
            Tok::RPar => Err(Erreur::Syntaxe(
                "opérande manquant avant ')'".into(),
            )),
            autre => Err(Erreur::Syntaxe(format!(
                "opérande manquant avant '{}'",
                format_tok(&autre)
            ))),
        }
    }
}

/// Analyse complète : texte -> jetons -> arbre.
/// Erreurs `Syntaxe` : entrée vide, parenthèses déséquilibrées, opérande manquant,
/// caractère inconnu, jetons en trop après une expression complète.
pub fn analyser(source: &str) -> Result<Expr> {
    let jetons = tokenize(source)?;
    trace!(jetons = %format_tokens(&jetons), "jetons");

    if matches!(jetons.first(), Some(Tok::Fin) | None) {
        return Err(Erreur::Syntaxe("entrée vide".into()));
    }

    let mut a = Analyseur {
        jetons,
        pos: 0,
        profondeur: 0,
    };
    let arbre = a.expression(0)?;

    match a.courant() {
        Tok::Fin => Ok(arbre),
        Tok::RPar => Err(Erreur::Syntaxe("parenthèse fermante sans ouvrante".into())),
        autre => Err(Erreur::Syntaxe(format!(
            "jeton inattendu après l’expression: '{}'",
            format_tok(autre)
        ))),
    }
}

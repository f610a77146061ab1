// src/noyau/expr.rs
//
// Arbre d’expression (immuable une fois construit).
// - Lit : littéral décimal exact
// - Var : variable (liée seulement à l’évaluation)
// - Bin : opération binaire
// - Neg : moins unaire

use std::fmt;

use super::decimal::Decimal;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    Div,
    Mod,
    Puiss,
}

impl OpBinaire {
    pub fn symbole(self) -> char {
        match self {
            OpBinaire::Plus => '+',
            OpBinaire::Moins => '-',
            OpBinaire::Fois => '*',
            OpBinaire::Div => '/',
            OpBinaire::Mod => '%',
            OpBinaire::Puiss => '^',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Lit(Decimal),
    Var(String),
    Bin(OpBinaire, Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn bin(op: OpBinaire, a: Expr, b: Expr) -> Expr {
        Expr::Bin(op, Box::new(a), Box::new(b))
    }

    pub fn neg(x: Expr) -> Expr {
        Expr::Neg(Box::new(x))
    }

    /// Noms des variables référencées (ordre de première apparition, sans doublon).
    /// Itératif : pas de récursion sur les longues chaînes gauche.
    pub fn variables(&self) -> Vec<&str> {
        let mut noms: Vec<&str> = Vec::new();
        let mut pile: Vec<&Expr> = vec![self];

        while let Some(e) = pile.pop() {
            match e {
                Expr::Lit(_) => {}
                Expr::Var(nom) => {
                    if !noms.contains(&nom.as_str()) {
                        noms.push(nom);
                    }
                }
                Expr::Neg(x) => pile.push(x),
                Expr::Bin(_, a, b) => {
                    // b d’abord : a est dépilé en premier (ordre de lecture)
                    pile.push(b);
                    pile.push(a);
                }
            }
        }
        noms
    }
}

/* ------------------------ Libération itérative ------------------------ */

/// Détache les enfants de `e` (remplacés par des feuilles) et les empile.
fn detacher_enfants(e: &mut Expr, pile: &mut Vec<Expr>) {
    let feuille = || Expr::Lit(Decimal::zero());
    match e {
        Expr::Lit(_) | Expr::Var(_) => {}
        Expr::Neg(x) => pile.push(std::mem::replace(&mut **x, feuille())),
        Expr::Bin(_, a, b) => {
            pile.push(std::mem::replace(&mut **a, feuille()));
            pile.push(std::mem::replace(&mut **b, feuille()));
        }
    }
}

// Le Drop par défaut descendrait récursivement une chaîne `1 + 1 + … + 1`.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut pile = Vec::new();
        detacher_enfants(self, &mut pile);
        while let Some(mut e) = pile.pop() {
            detacher_enfants(&mut e, &mut pile);
            // `e` n’a plus que des feuilles : libéré sans récursion
        }
    }
}

/* ------------------------ Affichage debug (entièrement parenthésé) ------------------------ */

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(d) => write!(f, "{d}"),
            Expr::Var(s) => write!(f, "{s}"),
            Expr::Neg(x) => write!(f, "(-{x})"),
            Expr::Bin(op, a, b) => write!(f, "({a}{}{b})", op.symbole()),
        }
    }
}

//! Noyau — évaluation (pipeline réel)
//!
//! texte -> jetons -> arbre (une seule fois) -> évaluation (autant de fois que voulu)
//!
//! Chaque pas arithmétique passe par le moteur décimal, à l’échelle des réglages.
//! L’évaluation est itérative (pile de tâches explicite) : une longue chaîne
//! `1 + 1 + … + 1` ne consomme pas la pile d’appels.

use std::collections::HashMap;

use num_integer::Integer;
use serde::Deserialize;
use tracing::debug;

use super::decimal::Decimal;
use super::derive::pow_avec;
use super::erreur::{Erreur, Result};
use super::expr::{Expr, OpBinaire};
use super::moteur::{add, div, mul, sub};
use super::reglages::Reglages;
use super::syntaxe::analyser;

/* ------------------------ Liaisons (nom -> valeur) ------------------------ */

/// Valeurs des variables, consultées seulement à l’évaluation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Liaisons(HashMap<String, Decimal>);

impl Liaisons {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajout chaîné : `Liaisons::new().avec("x", 2).avec("y", 3)`.
    pub fn avec(mut self, nom: impl Into<String>, valeur: impl Into<Decimal>) -> Self {
        self.0.insert(nom.into(), valeur.into());
        self
    }

    pub fn inserer(&mut self, nom: impl Into<String>, valeur: Decimal) -> Option<Decimal> {
        self.0.insert(nom.into(), valeur)
    }

    pub fn get(&self, nom: &str) -> Option<&Decimal> {
        self.0.get(nom)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for Liaisons {
    fn from_iter<I: IntoIterator<Item = (K, Decimal)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/* ------------------------ Évaluateur ------------------------ */

#[derive(Clone, Copy, Debug, Default)]
pub struct Evaluateur {
    reglages: Reglages,
}

enum Tache<'a> {
    Visiter(&'a Expr),
    Appliquer(&'a Expr),
}

fn depiler(valeurs: &mut Vec<Decimal>) -> Result<Decimal> {
    // arbre bien formé => jamais vide ici
    valeurs
        .pop()
        .ok_or_else(|| Erreur::Syntaxe("arbre d’expression incomplet".into()))
}

impl Evaluateur {
    pub fn new(reglages: Reglages) -> Self {
        Self { reglages }
    }

    pub fn reglages(&self) -> Reglages {
        self.reglages
    }

    /// Opération binaire à l’échelle des réglages.
    fn appliquer(&self, op: OpBinaire, a: &Decimal, b: &Decimal) -> Result<Decimal> {
        let e = self.reglages.echelle;
        match op {
            OpBinaire::Plus => Ok(add(a, b, e)),
            OpBinaire::Moins => Ok(sub(a, b, e)),
            OpBinaire::Fois => Ok(mul(a, b, e)),
            OpBinaire::Div => div(a, b, e),
            // a - b*floor(a/b), floor du quotient EXACT : reste du signe du diviseur
            OpBinaire::Mod => {
                if b.is_zero() {
                    return Err(Erreur::DivisionParZero);
                }
                let k = a.echelle().max(b.echelle());
                let q = Decimal::from(a.aligner(k).div_floor(&b.aligner(k)));
                Ok(sub(a, &mul(b, &q, e), e))
            }
            OpBinaire::Puiss => pow_avec(a, b, e, self.reglages.puissance),
        }
    }

    /// Évalue un arbre (résultat brut, non normalisé).
    pub fn evaluer(&self, racine: &Expr, liaisons: &Liaisons) -> Result<Decimal> {
        let mut taches = vec![Tache::Visiter(racine)];
        let mut valeurs: Vec<Decimal> = Vec::new();

        while let Some(t) = taches.pop() {
            match t {
                Tache::Visiter(e) => match e {
                    Expr::Lit(d) => valeurs.push(d.clone()),
                    Expr::Var(nom) => {
                        let v = liaisons
                            .get(nom)
                            .ok_or_else(|| Erreur::VariableInconnue(nom.clone()))?;
                        valeurs.push(v.clone());
                    }
                    Expr::Neg(x) => {
                        taches.push(Tache::Appliquer(e));
                        taches.push(Tache::Visiter(x));
                    }
                    Expr::Bin(_, a, b) => {
                        // a est évalué avant b
                        taches.push(Tache::Appliquer(e));
                        taches.push(Tache::Visiter(b));
                        taches.push(Tache::Visiter(a));
                    }
                },

                Tache::Appliquer(e) => match e {
                    Expr::Neg(_) => {
                        let x = depiler(&mut valeurs)?;
                        valeurs.push(sub(&Decimal::zero(), &x, self.reglages.echelle));
                    }
                    Expr::Bin(op, _, _) => {
                        let b = depiler(&mut valeurs)?;
                        let a = depiler(&mut valeurs)?;
                        valeurs.push(self.appliquer(*op, &a, &b)?);
                    }
                    // les feuilles ne sont jamais planifiées en Appliquer
                    Expr::Lit(_) | Expr::Var(_) => {}
                },
            }
        }

        let resultat = depiler(&mut valeurs)?;
        if !valeurs.is_empty() {
            return Err(Erreur::Syntaxe("arbre d’expression incohérent".into()));
        }
        Ok(resultat)
    }
}

/* ------------------------ Formule compilée ------------------------ */

/// Formule analysée une seule fois, réévaluable avec des liaisons différentes.
#[derive(Clone, Debug)]
pub struct Formule {
    arbre: Expr,
    evaluateur: Evaluateur,
}

impl Formule {
    pub fn analyser(source: &str, reglages: Reglages) -> Result<Self> {
        let arbre = analyser(source)?;
        debug!(source, echelle = reglages.echelle, "formule compilée");
        Ok(Self {
            arbre,
            evaluateur: Evaluateur::new(reglages),
        })
    }

    pub fn arbre(&self) -> &Expr {
        &self.arbre
    }

    /// Variables à lier avant d’évaluer (ordre de première apparition).
    pub fn variables(&self) -> Vec<&str> {
        self.arbre.variables()
    }

    /// Valeur brute (échelle des réglages, zéros de queue conservés).
    pub fn evaluer_brut(&self, liaisons: &Liaisons) -> Result<Decimal> {
        self.evaluateur.evaluer(&self.arbre, liaisons)
    }

    /// Valeur normalisée, en texte.
    pub fn evaluer(&self, liaisons: &Liaisons) -> Result<String> {
        Ok(self.evaluer_brut(liaisons)?.normaliser().to_string())
    }
}

/// API publique : évalue une formule une fois.
pub fn eval_expression(source: &str, liaisons: &Liaisons, reglages: Reglages) -> Result<String> {
    Formule::analyser(source, reglages)?.evaluer(liaisons)
}

/// API publique : analyse une fois, renvoie une fermeture réutilisable.
pub fn compile_expression(
    source: &str,
    reglages: Reglages,
) -> Result<impl Fn(&Liaisons) -> Result<String> + Clone + Send + Sync> {
    let formule = Formule::analyser(source, reglages)?;
    Ok(move |liaisons: &Liaisons| formule.evaluer(liaisons))
}

// src/chaine.rs
//
// Chain — enchaînement fluide d’opérations sur UNE valeur courante.
//
// Rôle:
// - garder (valeur, réglages) et déléguer chaque appel au noyau
// - rendre le même constructeur pour l’appel suivant
// - `done()` : seule sortie normalisée (et seul endroit où un '+' peut être ajouté)
//
// Contrats:
// - la première erreur est conservée ; les appels suivants sont ignorés
// - `raw()` expose la valeur brute (zéros de queue de l’échelle compris)

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::noyau::decimal::{Decimal, Nombre};
use crate::noyau::derive;
use crate::noyau::erreur::Result;
use crate::noyau::moteur;
use crate::noyau::reglages::Reglages;

/// Options de `done_with`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OptionsFin {
    /// Préfixer les valeurs strictement positives par '+'.
    pub plus: bool,
}

#[derive(Clone, Debug)]
pub struct Chain {
    valeur: Result<Decimal>,
    reglages: Reglages,
}

impl Chain {
    pub fn new(nombre: impl Nombre, reglages: Reglages) -> Self {
        Self {
            valeur: nombre.en_decimal(),
            reglages,
        }
    }

    fn appliquer(mut self, f: impl FnOnce(&Decimal, &Reglages) -> Result<Decimal>) -> Self {
        if let Ok(v) = &self.valeur {
            self.valeur = f(v, &self.reglages);
        }
        self
    }

    /// Change l’échelle des opérations suivantes.
    pub fn scale(mut self, echelle: u32) -> Self {
        self.reglages.echelle = echelle;
        self
    }

    pub fn add(self, nombre: impl Nombre) -> Self {
        self.appliquer(|v, r| Ok(moteur::add(v, &nombre.en_decimal()?, r.echelle)))
    }

    /// Ajoute chaque nombre, dans l’ordre.
    pub fn add_all<I>(self, nombres: I) -> Self
    where
        I: IntoIterator,
        I::Item: Nombre,
    {
        nombres.into_iter().fold(self, Chain::add)
    }

    pub fn sub(self, nombre: impl Nombre) -> Self {
        self.appliquer(|v, r| Ok(moteur::sub(v, &nombre.en_decimal()?, r.echelle)))
    }

    pub fn mul(self, nombre: impl Nombre) -> Self {
        self.appliquer(|v, r| Ok(moteur::mul(v, &nombre.en_decimal()?, r.echelle)))
    }

    pub fn div(self, diviseur: impl Nombre) -> Self {
        self.appliquer(|v, r| moteur::div(v, &diviseur.en_decimal()?, r.echelle))
    }

    pub fn pow(self, puissance: impl Nombre) -> Self {
        self.appliquer(|v, r| {
            derive::pow_avec(v, &puissance.en_decimal()?, r.echelle, r.puissance)
        })
    }

    pub fn floor(self, precision: i64) -> Self {
        self.appliquer(|v, _| derive::floor(v, precision))
    }

    pub fn ceil(self, precision: i64) -> Self {
        self.appliquer(|v, _| derive::ceil(v, precision))
    }

    pub fn round(self, precision: i64) -> Self {
        self.appliquer(|v, _| derive::round(v, precision))
    }

    /// Valeur absolue (une valeur négative est multipliée par -1 à l’échelle courante).
    pub fn abs(self) -> Self {
        self.appliquer(|v, r| {
            if v.is_negative() {
                Ok(moteur::mul(v, &Decimal::from(-1), r.echelle))
            } else {
                Ok(v.clone())
            }
        })
    }

    /// Garde le plus grand (comparaisons à l’échelle courante) ; l’opérande gagnant est gardé tel quel.
    pub fn max<I>(self, nombres: I) -> Self
    where
        I: IntoIterator,
        I::Item: Nombre,
    {
        self.extremum(nombres, Ordering::Less)
    }

    /// Garde le plus petit (comparaisons à l’échelle courante).
    pub fn min<I>(self, nombres: I) -> Self
    where
        I: IntoIterator,
        I::Item: Nombre,
    {
        self.extremum(nombres, Ordering::Greater)
    }

    fn extremum<I>(self, nombres: I, remplacer_si: Ordering) -> Self
    where
        I: IntoIterator,
        I::Item: Nombre,
    {
        self.appliquer(|v, r| {
            let mut gagnant = v.clone();
            for n in nombres {
                let n = n.en_decimal()?;
                if moteur::compare(&gagnant, &n, r.echelle) == remplacer_si {
                    gagnant = n;
                }
            }
            Ok(gagnant)
        })
    }

    /// Requête pure : valeur courante comparée à `nombre` (à l’échelle courante).
    pub fn compare(&self, nombre: impl Nombre) -> Result<Ordering> {
        let v = self.raw()?;
        Ok(moteur::compare(v, &nombre.en_decimal()?, self.reglages.echelle))
    }

    /// Valeur finale normalisée.
    pub fn done(&self) -> Result<String> {
        self.done_with(OptionsFin::default())
    }

    pub fn done_with(&self, options: OptionsFin) -> Result<String> {
        let texte = self.raw()?.normaliser().to_string();
        if options.plus && self.compare(0)? == Ordering::Greater {
            return Ok(format!("+{texte}"));
        }
        Ok(texte)
    }

    /// Valeur brute, non normalisée.
    pub fn raw(&self) -> Result<&Decimal> {
        self.valeur.as_ref().map_err(Clone::clone)
    }

    pub fn reglages(&self) -> Reglages {
        self.reglages
    }
}

/// Texte : la valeur normalisée (ou le message de la première erreur).
impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.done() {
            Ok(texte) => f.write_str(&texte),
            Err(e) => write!(f, "{e}"),
        }
    }
}

/// JSON : la valeur normalisée, en chaîne.
impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.done() {
            Ok(texte) => serializer.serialize_str(&texte),
            Err(e) => Err(serde::ser::Error::custom(e)),
        }
    }
}

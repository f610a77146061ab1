// src/main.rs
//
// qpur — point d’entrée en ligne de commande
// ------------------------------------------
// - eval : évalue une formule (variables via --var x=2 ou --liaisons '{"x":"2"}')
// - pi   : chiffres de π (option --formate : lignes de 50 caractères)
// - sqrt : racine carrée (Newton borné, ou --converge)
//
// Résultat normalisé sur stdout ; erreurs sur stderr, code de sortie non nul.
// Traces : RUST_LOG=decimal_qpur=trace qpur eval "2^10"

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use decimal_qpur::{
    evaluate, pi, pi_formatted, sqrt, sqrt_converged, Decimal, Liaisons, MethodePuissance,
    Reglages, ECHELLE_DEFAUT,
};

/// Titre unique (aide + version).
const TITRE_APP: &str = "Calculatrice décimale Q-pur";

#[derive(Parser, Debug)]
#[command(name = "qpur", version, about = TITRE_APP)]
struct Cli {
    /// Chiffres après la virgule gardés par chaque opération
    #[arg(long, global = true, default_value_t = ECHELLE_DEFAUT)]
    echelle: u32,

    #[command(subcommand)]
    commande: Commande,
}

#[derive(Subcommand, Debug)]
enum Commande {
    /// Évalue une formule : + - * / % ^, parenthèses, variables
    Eval {
        expression: String,

        /// Variable liée, forme nom=valeur (répétable)
        #[arg(long = "var", value_name = "NOM=VALEUR")]
        vars: Vec<String>,

        /// Liaisons en JSON : {"x": "2", "y": 3}
        #[arg(long)]
        liaisons: Option<String>,

        /// Puissance par carrés (O(log n)) au lieu de l’itérative
        #[arg(long)]
        rapide: bool,
    },

    /// Chiffres de π
    Pi {
        /// Nombre de décimales (défaut : --echelle)
        decimales: Option<u32>,

        /// Lignes de 50 caractères
        #[arg(long)]
        formate: bool,
    },

    /// Racine carrée
    Sqrt {
        nombre: String,

        /// Itère jusqu’à stabilisation plutôt que selon la grandeur du nombre
        #[arg(long)]
        converge: bool,
    },
}

/* ------------------------ Liaisons CLI ------------------------ */

fn lire_var(texte: &str) -> anyhow::Result<(String, Decimal)> {
    let (nom, valeur) = texte
        .split_once('=')
        .ok_or_else(|| anyhow!("--var attend nom=valeur, reçu {texte:?}"))?;
    let valeur: Decimal = valeur
        .trim()
        .parse()
        .with_context(|| format!("valeur de la variable {nom:?}"))?;
    Ok((nom.trim().to_string(), valeur))
}

fn construire_liaisons(json: Option<&str>, vars: &[String]) -> anyhow::Result<Liaisons> {
    let mut liaisons = match json {
        Some(j) => serde_json::from_str::<Liaisons>(j).context("--liaisons: JSON invalide")?,
        None => Liaisons::new(),
    };
    for v in vars {
        let (nom, valeur) = lire_var(v)?;
        liaisons.inserer(nom, valeur);
    }
    Ok(liaisons)
}

/* ------------------------ Exécution ------------------------ */

fn executer(cli: Cli) -> anyhow::Result<String> {
    let reglages = Reglages::default().avec_echelle(cli.echelle);

    match cli.commande {
        Commande::Eval {
            expression,
            vars,
            liaisons,
            rapide,
        } => {
            let liaisons = construire_liaisons(liaisons.as_deref(), &vars)?;
            let reglages = if rapide {
                reglages.avec_puissance(MethodePuissance::ParCarres)
            } else {
                reglages
            };
            evaluate(&expression, &liaisons, reglages)
                .with_context(|| format!("évaluation de {expression:?}"))
        }

        Commande::Pi { decimales, formate } => {
            let n = decimales.unwrap_or(cli.echelle);
            Ok(if formate { pi_formatted(n) } else { pi(n) })
        }

        Commande::Sqrt { nombre, converge } => {
            let r = if converge {
                sqrt_converged(nombre.as_str(), cli.echelle)
            } else {
                sqrt(nombre.as_str(), cli.echelle)
            };
            r.with_context(|| format!("racine carrée de {nombre:?}"))
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let sortie = executer(Cli::parse())?;
    println!("{sortie}");
    Ok(())
}

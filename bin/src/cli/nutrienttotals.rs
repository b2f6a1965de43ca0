use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use pipeline::{calculator::NutrientCalculator, dataset::Dataset, nutrient::NutrientValues};

/// Sums the nutrients of 100 g of each of the given foods.
#[derive(Args, Debug)]
pub struct Command {
    /// Path to a dataset CSV written by extract-csv.
    dataset: PathBuf,

    /// Names of the foods to add up, exactly as listed by food-names.
    #[arg(required = true)]
    foods: Vec<String>,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<()> {
    let dataset = Dataset::load(&cmd.dataset)?;
    let result = NutrientCalculator::new(&dataset).totals(&cmd.foods);

    for name in &result.unknown {
        eprintln!("Unknown food (skipped): {name:?}.");
    }
    if result.matched.is_empty() {
        bail!("none of the given foods are in the dataset");
    }

    print!("{}", format_totals(&result.totals));
    Ok(())
}

/// Formats one line per nutrient, as its key, value and unit.
fn format_totals(totals: &NutrientValues) -> String {
    totals
        .iter()
        .map(|(key, value)| format!("{:<14} {:>10.2} {}\n", key.as_ref(), value, key.unit()))
        .collect()
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use pipeline::nutrient::NutrientKey;

    use super::*;

    #[gtest]
    fn formats_every_nutrient_with_unit() {
        let totals: NutrientValues = [(NutrientKey::ProteinG, 39.0), (NutrientKey::VitARaeMcg, 1.5)]
            .into_iter()
            .collect();

        let formatted = format_totals(&totals);
        let lines: Vec<&str> = formatted.lines().collect();

        expect_eq!(lines.len(), 13);
        expect_eq!(lines[0], "energy_kcal          0.00 kcal");
        expect_eq!(lines[1], "protein_g           39.00 g");
        expect_eq!(lines[8], "vit_a_rae_mcg        1.50 mcg");
    }
}

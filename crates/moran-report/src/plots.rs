//! Charts built from a simulation history.

use crate::svg::{HeatMap, LineChart};
use moran_core::{History, LabelSet, Metric};

/// Axis title for a per-label metric
pub fn metric_title(metric: Metric) -> &'static str {
    match metric {
        Metric::Size => "# Individuals",
        Metric::AvgBirthPayoff => "Average Birth Payoff",
        Metric::AvgDeathPayoff => "Average Death Payoff",
        Metric::BirthFitness => "Birth Fitness",
        Metric::DeathFitness => "Death Fitness",
    }
}

/// One line per label for `metric`
pub fn metric_chart(history: &History, metric: Metric) -> LineChart {
    let generations = history.generations();
    let mut chart = LineChart::new(metric_title(metric), "Generation", metric_title(metric));

    for label in history.labels().iter() {
        let values = history.series(label, metric).unwrap_or_default();
        let points = generations
            .iter()
            .zip(values)
            .map(|(&g, v)| (g as f64, v))
            .collect();
        chart.add_series(label, points);
    }

    chart
}

/// Sub-population sizes, y axis fixed to `[0, N]`
pub fn size_chart(history: &History) -> LineChart {
    let total = history.population_size() as f64;
    metric_chart(history, Metric::Size).with_y_range(0.0, total)
}

pub fn entropy_chart(history: &History) -> LineChart {
    let points = history
        .generations()
        .into_iter()
        .zip(history.entropy_series())
        .map(|(g, h)| (g as f64, Some(h)))
        .collect();

    let mut chart = LineChart::new("Entropy", "Generation", "");
    chart.add_series("Entropy", points);
    chart
}

/// Label of every site of a 2D grid
pub fn snapshot_map(cells: &[Vec<usize>], labels: &LabelSet) -> HeatMap {
    HeatMap {
        title: "Population snapshot".to_string(),
        cells: cells.to_vec(),
        labels: labels.iter().map(str::to_string).collect(),
    }
}

/// Every history chart, keyed by file name
pub fn history_charts(history: &History) -> Vec<(&'static str, LineChart)> {
    vec![
        ("sizes.svg", size_chart(history)),
        ("avg_birth_payoff.svg", metric_chart(history, Metric::AvgBirthPayoff)),
        ("avg_death_payoff.svg", metric_chart(history, Metric::AvgDeathPayoff)),
        ("birth_fitness.svg", metric_chart(history, Metric::BirthFitness)),
        ("death_fitness.svg", metric_chart(history, Metric::DeathFitness)),
        ("entropy.svg", entropy_chart(history)),
    ]
}

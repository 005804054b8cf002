use confbench::core::models::method::{Method, MethodSet};
use confbench::core::utils::stats::Summary;
use confbench::engine::benchmark::{BenchmarkReport, CheapPair, Tally};
use std::fmt::Write;

/// Formats the benchmark report for the terminal: one row per molecule, then the
/// aggregates for both metrics.
pub fn render(report: &BenchmarkReport, methods: &MethodSet) -> String {
    let a = methods.label(Method::CheapA);
    let b = methods.label(Method::CheapB);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Benchmark against {} (Spearman rank correlation, RMSD in kcal/mol)",
        methods.label(Method::Reference)
    );
    let _ = writeln!(
        out,
        "{:>10} {:>6}  {:>12} {:>12}  {:>12} {:>12}",
        "molecule",
        "points",
        format!("rho {}", a),
        format!("rho {}", b),
        format!("rmsd {}", a),
        format!("rmsd {}", b),
    );
    for score in &report.scores {
        let _ = writeln!(
            out,
            "{:>10} {:>6}  {:>12.4} {:>12.4}  {:>12.4} {:>12.4}",
            score.molecule,
            score.points,
            score.correlation.cheap_a,
            score.correlation.cheap_b,
            score.rmsd.cheap_a,
            score.rmsd.cheap_b,
        );
    }
    out.push('\n');

    write_metric(&mut out, "Spearman rho", &report.correlation, methods);
    write_metric(&mut out, "RMSD", &report.rmsd, methods);
    write_tally(&mut out, "Higher correlation", &report.correlation_tally, a, b);
    write_tally(&mut out, "Lower RMSD", &report.rmsd_tally, a, b);

    let _ = writeln!(out, "Data points:          {}", report.data_points);
    let _ = writeln!(
        out,
        "Molecules evaluated:  {} of {}",
        report.molecules_included(),
        report.molecules_total
    );
    if !report.skipped.is_empty() {
        let _ = writeln!(out, "Molecules excluded:   {}", report.skipped.len());
    }
    out
}

fn write_metric(
    out: &mut String,
    name: &str,
    summary: &CheapPair<Option<Summary>>,
    methods: &MethodSet,
) {
    for method in Method::CHEAP {
        let label = methods.label(method);
        match summary.get(method).flatten() {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "{:<14} {:<10} mean {:>8.4}  std {:>8.4}",
                    name, label, s.mean, s.std
                );
            }
            None => {
                let _ = writeln!(out, "{:<14} {:<10} n/a", name, label);
            }
        }
    }
}

fn write_tally(out: &mut String, name: &str, tally: &Tally, a: &str, b: &str) {
    let _ = writeln!(
        out,
        "{:<20} {}: {}  {}: {}  equal: {}",
        name, a, tally.cheap_a, b, tally.cheap_b, tally.equal
    );
}

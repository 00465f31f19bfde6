use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use clap::{Arg, ArgAction, Command, ValueHint};
use log::LevelFilter;

use hedonic::config::{CvConfig, RunConfig};
use hedonic::data::read_housing;
use hedonic::describe;
use hedonic::evaluation::{
    baseline_roster, compare_models, ensemble_roster, scaled_roster, ComparisonEntry, GridSearch,
};
use hedonic::final_fit::FinalEstimator;
use hedonic::metrics::Scoring;
use hedonic::report::{plots, Report, ReportSection};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Warn)
        .parse_env(env_logger::Env::default().filter_or("HEDONIC_LOG", "warn,hedonic=info"))
        .init();

    let matches = Command::new("hedonic")
        .version(clap::crate_version!())
        .about("Model selection and evaluation for house-price regression")
        .arg(
            Arg::new("data")
                .help("Path to the whitespace-delimited housing file")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .help("Write an HTML diagnostics report to this path")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("folds")
                .long("folds")
                .help("Cross-validation fold count")
                .default_value("10")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .help("Seed for the split and fold shuffles")
                .default_value("7")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("validation-ratio")
                .long("validation-ratio")
                .help("Fraction of rows held out for validation")
                .default_value("0.2")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("scoring")
                .long("scoring")
                .help("Scoring function: neg_mean_squared_error, neg_mean_absolute_error, r2")
                .default_value("neg_mean_squared_error"),
        )
        .arg(
            Arg::new("skip-tuning")
                .long("skip-tuning")
                .help("Skip the grid searches")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let scoring = Scoring::from_str(
        matches
            .get_one::<String>("scoring")
            .expect("has a default")
            .as_str(),
    )
    .map_err(anyhow::Error::msg)?;

    let config = RunConfig {
        data_path: matches
            .get_one::<PathBuf>("data")
            .expect("required argument")
            .clone(),
        validation_ratio: *matches
            .get_one::<f64>("validation-ratio")
            .expect("has a default"),
        split_seed: *matches.get_one::<u64>("seed").expect("has a default"),
        cv: CvConfig {
            folds: *matches.get_one::<usize>("folds").expect("has a default"),
            seed: *matches.get_one::<u64>("seed").expect("has a default"),
        },
        scoring,
        report_path: matches.get_one::<PathBuf>("report").cloned(),
    };

    run(&config, matches.get_flag("skip-tuning"))
}

fn run(config: &RunConfig, skip_tuning: bool) -> Result<()> {
    let dataset = read_housing(&config.data_path)?;

    let (rows, cols) = describe::shape(&dataset);
    println!("shape: ({}, {})", rows, cols);
    println!("{}", describe::dtypes(&dataset));
    println!("{}", describe::head(&dataset, 30));
    println!("{}", describe::describe(&dataset));
    let corr = describe::correlation_matrix(&dataset);
    println!("{}", describe::format_correlation(&dataset, &corr));

    let split = dataset.train_validation_split(config.validation_ratio, config.split_seed)?;

    println!("== Baseline algorithms ==");
    let baseline = compare_models(
        &baseline_roster(),
        &split.x_train,
        &split.y_train,
        &config.cv,
        config.scoring,
    );
    print_entries(&baseline);

    println!("== Standardized algorithms ==");
    let scaled = compare_models(
        &scaled_roster(),
        &split.x_train,
        &split.y_train,
        &config.cv,
        config.scoring,
    );
    print_entries(&scaled);

    println!("== Ensemble algorithms ==");
    let ensembles = compare_models(
        &ensemble_roster(),
        &split.x_train,
        &split.y_train,
        &config.cv,
        config.scoring,
    );
    print_entries(&ensembles);

    if !skip_tuning {
        for search in [
            GridSearch::knn(),
            GridSearch::gradient_boosting(),
            GridSearch::extra_trees(),
        ] {
            println!("== Tuning {} ==", search.label);
            let result = search.run(&split.x_train, &split.y_train, &config.cv, config.scoring)?;
            println!("{:.6} using {}", result.best_score(), result.best_params());
            for (params, scores) in &result.entries {
                println!("{:.6} ({:.6}) with {}", scores.mean(), scores.std_dev(), params);
            }
        }
    }

    let final_report = FinalEstimator::reference().run(&split)?;
    println!("final validation MSE: {:.6}", final_report.mse);

    if let Some(report_path) = &config.report_path {
        let comparisons = [
            ("Baseline algorithms", &baseline),
            ("Standardized algorithms", &scaled),
            ("Ensemble algorithms", &ensembles),
        ];
        write_report(&dataset, &comparisons, report_path)?;
        println!("report written to {}", report_path.display());
    }

    Ok(())
}

fn print_entries(entries: &[ComparisonEntry]) {
    for entry in entries {
        match &entry.outcome {
            Ok(result) => println!(
                "{}: {:.6} ({:.6})",
                entry.label,
                result.mean(),
                result.std_dev()
            ),
            Err(err) => println!("{}: failed ({:#})", entry.label, err),
        }
    }
}

fn write_report(
    dataset: &hedonic::data::Dataset,
    comparisons: &[(&str, &Vec<ComparisonEntry>)],
    path: &std::path::Path,
) -> Result<()> {
    let mut report = Report::new("Housing dataset diagnostics");

    let mut summary = ReportSection::new("Summary statistics");
    summary.add_text(&describe::describe(dataset));
    let corr = describe::correlation_matrix(dataset);
    summary.add_text(&describe::format_correlation(dataset, &corr));
    report.add_section(summary);

    let mut histograms = ReportSection::new("Histograms");
    let mut densities = ReportSection::new("Density estimates");
    for (idx, name) in dataset.column_names().iter().enumerate() {
        histograms.add_plot(&plots::plot_histogram(dataset, name)?, &format!("hist{}", idx));
        densities.add_plot(&plots::plot_density(dataset, name)?, &format!("kde{}", idx));
    }
    report.add_section(histograms);
    report.add_section(densities);

    let mut boxes = ReportSection::new("Box plots");
    boxes.add_plot(&plots::plot_boxes(dataset), "boxes");
    report.add_section(boxes);

    let mut scatters = ReportSection::new("Feature vs target");
    for (idx, plot) in plots::plot_feature_target_scatters(dataset).iter().enumerate() {
        scatters.add_plot(plot, &format!("scatter{}", idx));
    }
    report.add_section(scatters);

    let mut matrix = ReportSection::new("Scatter matrix");
    for (idx, plot) in plots::plot_scatter_matrix(dataset).iter().enumerate() {
        matrix.add_plot(plot, &format!("pair{}", idx));
    }
    report.add_section(matrix);

    let mut heatmap = ReportSection::new("Correlation heat map");
    heatmap.add_plot(&plots::plot_correlation_heatmap(dataset), "corr");
    report.add_section(heatmap);

    let mut scores = ReportSection::new("Cross-validation score distributions");
    for (idx, (title, entries)) in comparisons.iter().enumerate() {
        scores.add_plot(
            &plots::plot_comparison_boxes(title, entries),
            &format!("cmp{}", idx),
        );
    }
    report.add_section(scores);

    report.save(path)
}

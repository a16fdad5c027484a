use anyhow::{Context, Result};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wolfi_ci::cli::commands::{
    read_change_set, ClassifyCommand, DependentsCommand, GenerateCommand, IndexCommand, OutputFormat,
};
use wolfi_ci::cli::output::*;
use wolfi_ci::cli::{Cli, Command};
use wolfi_ci::core::config::{GeneratorConfig, DEFAULT_CONFIG_FILE};
use wolfi_ci::generate::{GenerateOptions, PipelineGenerator};
use wolfi_ci::index::get_all_image_dependencies;
use wolfi_ci::ChangeKind;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Logs go to stderr; stdout carries the pipeline document
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Generate(cmd) => generate_pipeline(cmd, &cli, config).await?,
        Command::Dependents(cmd) => show_dependents(cmd, &cli, &config).await?,
        Command::Index(cmd) => show_index(cmd, &cli, &config).await?,
        Command::Classify(cmd) => classify_paths(cmd, config)?,
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<GeneratorConfig> {
    if let Some(path) = &cli.config {
        return GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load generator config {}", path));
    }

    let default_path = cli.root.join(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        info!("Using generator config {}", default_path.display());
        return GeneratorConfig::from_file(&default_path)
            .with_context(|| format!("Failed to load generator config {}", default_path.display()));
    }

    Ok(GeneratorConfig::default())
}

async fn generate_pipeline(cmd: &GenerateCommand, cli: &Cli, config: GeneratorConfig) -> Result<()> {
    let changes = read_change_set(cmd.changed_files.as_deref(), &cmd.paths)?;
    let branch = cmd.branch.clone().unwrap_or_else(|| config.default_branch.clone());
    let mut options = GenerateOptions::new(branch, &cmd.tag);

    let generator = PipelineGenerator::new(config);

    if cmd.include_dependents {
        let packages = generator.classifier().classify_package_changes(changes.paths());
        if !packages.is_empty() {
            let index = get_all_image_dependencies(&cli.root, generator.config())
                .await
                .context("Failed to load base image manifests")?;
            let dependents = index.reverse_lookup(&packages, "")?;
            info!("Rebuilding dependent base images: {:?}", dependents);
            options = options.with_extra_images(dependents);
        }
    }

    let generation = match generator.generate(&changes, &options) {
        Ok(generation) => generation,
        Err(e) if e.is_classification() => {
            eprintln!("{} {}", CROSS, style(&e).red());
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    generation
        .pipeline
        .validate()
        .context("Generated pipeline is invalid")?;

    eprintln!(
        "{} {} package step(s), {} base image step(s)",
        INFO,
        style(generation.package_count).cyan(),
        style(generation.image_count).cyan()
    );
    for step in generation.pipeline.steps() {
        eprintln!("{}", format_step(step));
    }

    let document = match cmd.format {
        OutputFormat::Yaml => generation.pipeline.to_yaml()?,
        OutputFormat::Json => generation.pipeline.to_json()?,
    };
    println!("{}", document);

    Ok(())
}

async fn show_dependents(cmd: &DependentsCommand, cli: &Cli, config: &GeneratorConfig) -> Result<()> {
    let index = get_all_image_dependencies(&cli.root, config)
        .await
        .context("Failed to load base image manifests")?;

    let breakdown = index.dependents_by_package(&cmd.packages, &cmd.repo)?;
    let images = index.reverse_lookup(&cmd.packages, &cmd.repo)?;

    if cmd.json {
        let data = serde_json::json!({
            "packages": breakdown,
            "images": images,
        });
        println!("{}", serde_json::to_string_pretty(&data)?);
        return Ok(());
    }

    for dependents in &breakdown {
        println!("{}", format_dependents(dependents));
    }

    if images.is_empty() {
        println!("{} No base images depend on these packages", INFO);
    } else {
        println!(
            "{} {} base image(s) affected: {}",
            CHECK,
            style(images.len()).cyan(),
            style(images.join(", ")).bold()
        );
    }

    Ok(())
}

async fn show_index(cmd: &IndexCommand, cli: &Cli, config: &GeneratorConfig) -> Result<()> {
    let index = get_all_image_dependencies(&cli.root, config)
        .await
        .context("Failed to load base image manifests")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(index.packages_by_image())?);
        return Ok(());
    }

    if index.is_empty() {
        println!("{} No base image manifests found", WARN);
        return Ok(());
    }

    for (image, packages) in index.packages_by_image() {
        println!("{}", format_index_entry(image, packages));
    }

    Ok(())
}

fn classify_paths(cmd: &ClassifyCommand, config: GeneratorConfig) -> Result<()> {
    let changes = read_change_set(cmd.changed_files.as_deref(), &cmd.paths)?;
    let generator = PipelineGenerator::new(config);
    let classifier = generator.classifier();

    let mut violations = 0;
    for path in changes.paths() {
        let kind = classifier.classify(path);
        let under_images = classifier.is_under_images(path);
        if kind == ChangeKind::Unrecognized && under_images {
            violations += 1;
        }
        println!("{}", format_change(path, &kind, under_images));
    }

    if violations > 0 {
        anyhow::bail!("{} path(s) violate the image naming convention", violations);
    }

    Ok(())
}

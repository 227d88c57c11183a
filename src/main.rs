mod cli;
mod error;
mod services;
mod types;

use anyhow::Context;
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, RenderArgs, ValidateArgs};
use error::{Result, SplitterError};
use services::{ArtifactPipeline, ComplexityAnalyzer, ContentFetcher, HelperRegistry, SplitPlanner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber;
use types::{Artifact, RenderOptions, RenderReport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let result = match &cli.command {
        Commands::Render(args) => handle_render_command(args, &cli.output).await,
        Commands::Analyze(args) => handle_analyze_command(args).await,
        Commands::Validate(args) => handle_validate_command(args).await,
    };

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_render_command(args: &RenderArgs, output_dir: &PathBuf) -> Result<()> {
    info!("Starting render operation with {} sources", args.sources.len());

    let validated_sources = ContentFetcher::validate_sources(&args.sources).await?;
    let sources = ContentFetcher::expand_sources(&validated_sources);
    info!("Validated {} sources", sources.len());

    // Check if output directory exists and handle force flag
    if output_dir.exists() && !args.force {
        let entries = std::fs::read_dir(output_dir)
            .map_err(|e| SplitterError::OutputDirectory {
                reason: format!("Cannot read output directory: {}", e),
            })?;

        if entries.count() > 0 {
            return Err(SplitterError::OutputDirectory {
                reason: "Output directory is not empty. Use --force to overwrite.".to_string(),
            });
        }
    }

    let options = RenderOptions {
        priority_levels: args.priority_levels,
        skeleton_loading: !args.no_skeleton,
        feedback_enabled: args.feedback,
        artifact_max_size: args.max_size,
        split_threshold: args.split_threshold,
        use_logical_division: !args.no_logical_division,
    };

    let data = ContentFetcher::load_data_context(args.data.as_deref()).await?;
    let pipeline = ArtifactPipeline::new(HelperRegistry::with_builtins());

    ensure_output_directory(output_dir).await?;

    for (idx, source) in sources.iter().enumerate() {
        info!("Processing source {}/{}: {}", idx + 1, sources.len(), source);

        let (template, metadata) = ContentFetcher::fetch_content(source).await?;
        let profile = pipeline.analyze(&template);
        let plan = pipeline.plan(&template, &options);

        info!(
            "Template '{}' has {} components (score {}), plan '{}'",
            metadata.filename, profile.component_count, profile.complexity_score,
            plan.kind()
        );

        let artifacts = pipeline
            .render_to_artifacts(&template, &data, &options)
            .await?;

        let mut output_files = Vec::new();
        for (artifact_idx, artifact) in artifacts.iter().enumerate() {
            let output_file = generate_output_filename(
                output_dir,
                &metadata.filename,
                artifact_idx + 1,
                artifacts.len(),
            );
            tokio::fs::write(&output_file, &artifact.content)
                .await
                .map_err(|e| SplitterError::OutputDirectory {
                    reason: format!(
                        "Failed to write artifact {}: {}",
                        output_file.display(),
                        e
                    ),
                })?;
            output_files.push(output_file);
        }

        let manifest_file = if args.include_manifest {
            let manifest_path = generate_manifest_filename(output_dir, &metadata.filename);
            write_manifest_file(&manifest_path, source, &metadata.filename, &profile, plan.kind(), &artifacts, &output_files)
                .await?;
            Some(manifest_path)
        } else {
            None
        };

        let report = RenderReport {
            source: source.clone(),
            plan_kind: plan.kind().to_string(),
            artifact_count: artifacts.len(),
            output_files,
            manifest_file,
        };

        info!(
            "Created {} artifacts for '{}' (plan '{}'):",
            report.artifact_count, report.source, report.plan_kind
        );
        for output_file in &report.output_files {
            info!("  - {}", output_file.display());
        }
        if let Some(manifest_file) = &report.manifest_file {
            info!("  - {} (manifest)", manifest_file.display());
        }
    }

    info!("Render operation completed successfully!");
    Ok(())
}

async fn handle_analyze_command(args: &AnalyzeArgs) -> Result<()> {
    info!("Starting analysis of {} sources", args.sources.len());

    let validated_sources = ContentFetcher::validate_sources(&args.sources).await?;
    let sources = ContentFetcher::expand_sources(&validated_sources);
    let analyzer = ComplexityAnalyzer::new();

    let options = RenderOptions {
        artifact_max_size: args.max_size,
        split_threshold: args.split_threshold,
        ..RenderOptions::default()
    };

    let mut all_analyses = HashMap::new();

    for source in sources {
        info!("Analyzing: {}", source);

        let (template, metadata) = ContentFetcher::fetch_content(&source).await?;
        let profile = analyzer.analyze(&template);
        let stats = analyzer.get_analysis_stats(&profile);
        let plan = SplitPlanner::decide(&profile, &options);

        // Print analysis to console
        println!("\n=== Analysis for '{}' ===", metadata.filename);
        println!("Source type: {:?}", metadata.source_type);
        println!("Size: {} chars", profile.size);
        println!("Components: {}", profile.component_count);
        println!(
            "Images: {} | Tables: {} | Forms: {} | Scripts: {}",
            profile.image_count, profile.table_count, profile.form_count, profile.script_count
        );
        println!("Complexity score: {}", profile.complexity_score);
        println!(
            "Sections: {}",
            if profile.division_points.is_empty() {
                "none".to_string()
            } else {
                profile
                    .division_points
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        );
        println!("Split decision: {}", plan.kind());

        if args.detailed {
            println!("\nSection Details:");
            println!("  Header/nav present: {}", profile.has_header);
            println!("  Main content present: {}", profile.has_main_content);
            println!("  Footer present: {}", profile.has_footer);
        }

        // Calculate what-if artifact counts
        println!("\nPotential Artifact Scenarios:");
        for max_size in [100_000usize, 250_000, 500_000, 1_000_000] {
            let estimated = SplitPlanner::estimated_artifact_count(profile.size, max_size);
            println!("  max size {}: ~{} artifacts", max_size, estimated);
        }

        // Store for JSON output
        all_analyses.insert(
            source.clone(),
            serde_json::json!({
                "metadata": metadata,
                "profile": profile,
                "stats": stats,
                "plan": plan.kind()
            }),
        );
    }

    // Write JSON output if requested
    if let Some(json_path) = &args.json_output {
        let json_content = serde_json::to_string_pretty(&all_analyses)
            .context("Failed to serialize analysis results")?;

        tokio::fs::write(json_path, json_content)
            .await
            .context("Failed to write JSON analysis file")?;

        info!("Analysis results written to: {}", json_path.display());
    }

    Ok(())
}

async fn handle_validate_command(args: &ValidateArgs) -> Result<()> {
    info!("Validating {} sources", args.sources.len());

    let mut valid_sources = Vec::new();
    let mut invalid_sources = Vec::new();

    for source in &args.sources {
        match ContentFetcher::validate_sources(&[source.clone()]).await {
            Ok(_) => {
                info!("✓ Valid: {}", source);
                valid_sources.push(source);

                if args.check_access {
                    match ContentFetcher::fetch_content(source).await {
                        Ok((template, _)) => {
                            info!("  Accessible, {} chars found", template.chars().count());
                        }
                        Err(e) => {
                            error!("  Cannot access content: {}", e);
                            invalid_sources.push((source, format!("Access error: {}", e)));
                        }
                    }
                }
            }
            Err(e) => {
                error!("✗ Invalid: {} - {}", source, e);
                invalid_sources.push((source, e.to_string()));
            }
        }
    }

    if let Some(data_path) = &args.data {
        match ContentFetcher::load_data_context(Some(data_path)).await {
            Ok(_) => info!("✓ Valid data context: {}", data_path.display()),
            Err(e) => {
                error!("✗ Invalid data context: {} - {}", data_path.display(), e);
                return Err(e);
            }
        }
    }

    println!("\n=== Validation Summary ===");
    println!("Valid sources: {}/{}", valid_sources.len(), args.sources.len());

    if !invalid_sources.is_empty() {
        println!("Invalid sources:");
        let invalid_count = invalid_sources.len();
        for (source, error) in invalid_sources {
            println!("  - {}: {}", source, error);
        }
        return Err(SplitterError::InvalidData {
            reason: format!("{} sources failed validation", invalid_count),
        });
    }

    println!("All sources are valid!");
    Ok(())
}

async fn ensure_output_directory(output_dir: &Path) -> Result<()> {
    if !output_dir.exists() {
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            SplitterError::OutputDirectory {
                reason: format!("Failed to create output directory: {}", e),
            }
        })?;
        info!("Created output directory: {}", output_dir.display());
    }
    Ok(())
}

fn generate_output_filename(
    output_dir: &Path,
    source_name: &str,
    artifact_number: usize,
    total_artifacts: usize,
) -> PathBuf {
    let base_name = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template");

    let filename = format!(
        "{}_artifact_{:0width$}_of_{}.html",
        base_name,
        artifact_number,
        total_artifacts,
        width = total_artifacts.to_string().len()
    );

    output_dir.join(filename)
}

fn generate_manifest_filename(output_dir: &Path, source_name: &str) -> PathBuf {
    let base_name = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("template");

    output_dir.join(format!("{}_manifest.json", base_name))
}

async fn write_manifest_file(
    manifest_path: &Path,
    source: &str,
    filename: &str,
    profile: &types::ComplexityProfile,
    plan_kind: &str,
    artifacts: &[Artifact],
    output_files: &[PathBuf],
) -> Result<()> {
    let manifest = serde_json::json!({
        "source": source,
        "filename": filename,
        "created_at": chrono::Utc::now().to_rfc3339(),
        "profile": profile,
        "plan": plan_kind,
        "total_artifacts": artifacts.len(),
        "artifacts": artifacts.iter().zip(output_files.iter()).enumerate().map(|(idx, (artifact, path))| {
            serde_json::json!({
                "index": idx + 1,
                "title": artifact.title,
                "type": artifact.artifact_type,
                "chars": artifact.content.chars().count(),
                "file": path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown")
            })
        }).collect::<Vec<_>>()
    });

    let json_content =
        serde_json::to_string_pretty(&manifest).map_err(|e| SplitterError::OutputDirectory {
            reason: format!("Failed to serialize manifest: {}", e),
        })?;

    tokio::fs::write(manifest_path, json_content)
        .await
        .map_err(|e| SplitterError::OutputDirectory {
            reason: format!("Failed to write manifest file: {}", e),
        })?;

    info!("Generated manifest file: {}", manifest_path.display());
    Ok(())
}

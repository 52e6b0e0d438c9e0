//! Build presentation pages from a workbook.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use slidershow_common::config::AppConfig;
use slidershow_media_cache::MediaCache;
use slidershow_page_builder::{
    plan_sheet, render_slides, sheet_output_path, FilenameLocator, Page, PlanOptions, Sheet,
    SheetPlan, Workbook,
};
use tokio::sync::Semaphore;

/// Flags of the `build` subcommand; they override the loaded config.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub file: PathBuf,
    pub sheet: Option<String>,
    pub output: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub replace: Vec<(String, String)>,
    pub search_dirs: Vec<PathBuf>,
    pub convert: bool,
    pub no_autogenerate: bool,
    pub no_check_mp4: bool,
    pub cache_dir: Option<PathBuf>,
    pub keep_going: bool,
}

/// Pair up `--replace-in-filename FROM TO` values.
pub fn replacement_pairs(values: Vec<String>) -> anyhow::Result<Vec<(String, String)>> {
    if values.len() % 2 != 0 {
        return Err(anyhow::anyhow!(
            "--replace-in-filename takes FROM and TO values, got {values:?}"
        ));
    }
    Ok(values
        .chunks_exact(2)
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect())
}

pub async fn run(mut config: AppConfig, options: BuildOptions) -> anyhow::Result<()> {
    apply_overrides(&mut config, &options);
    config.validate()?;

    let workbook = Workbook::open(&options.file)
        .map_err(|e| anyhow::anyhow!("Failed to load workbook: {e}"))?;
    let sheets: Vec<&Sheet> = match &options.sheet {
        Some(name) => vec![workbook.sheet(name)?],
        None => workbook.sheets.iter().collect(),
    };

    let locator = FilenameLocator::from_config(&config.filenames);
    let plan_options = PlanOptions {
        keep_going: options.keep_going,
    };
    let cache = Arc::new(MediaCache::with_ffmpeg(config.convert.clone())?);
    let page = Page::from_config(&config.page)?;

    for sheet in sheets {
        tracing::info!(file = %options.file.display(), sheet = %sheet.name, "Processing");

        let plan = plan_sheet(sheet, &locator, &plan_options)?;
        if plan.skipped > 0 {
            tracing::warn!(sheet = %sheet.name, skipped = plan.skipped, "Rows skipped");
        }

        let resolved = resolve_media(&cache, &plan).await?;
        let contents = render_slides(&plan.slides, |source| {
            resolved
                .get(source)
                .cloned()
                .unwrap_or_else(|| source.to_path_buf())
        });

        match &options.output {
            Some(output) => {
                let path = if options.sheet.is_some() {
                    output.clone()
                } else {
                    sheet_output_path(output, &sheet.name)
                };
                write_page(&path, &page.render(&contents)?)?;
                println!("Written: {}", path.display());
            }
            None => println!("{contents}"),
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, options: &BuildOptions) {
    if let Some(template) = &options.template {
        config.page.template = Some(template.clone());
    }
    config
        .filenames
        .replace
        .extend(options.replace.iter().cloned());
    config
        .filenames
        .search_dirs
        .extend(options.search_dirs.iter().cloned());

    if options.convert {
        config.convert.enable = true;
    }
    if options.no_autogenerate {
        config.convert.autogenerate = false;
    }
    if options.no_check_mp4 {
        config.convert.check_mp4_for_hevc = false;
    }
    if let Some(dir) = &options.cache_dir {
        config.convert.cache_dir = dir.clone();
    }
}

/// Resolve every media source of the sheet on the blocking pool, at most
/// one transcode per CPU at a time.
async fn resolve_media(
    cache: &Arc<MediaCache>,
    plan: &SheetPlan,
) -> anyhow::Result<HashMap<PathBuf, PathBuf>> {
    if !cache.config().enable {
        return Ok(HashMap::new());
    }

    let parallelism = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let permits = Arc::new(Semaphore::new(parallelism));

    let mut tasks = Vec::new();
    for source in plan.media_sources() {
        let permit = Arc::clone(&permits).acquire_owned().await?;
        let cache = Arc::clone(cache);
        let source = source.to_path_buf();
        tasks.push(tokio::task::spawn_blocking(move || {
            let resolved = cache.resolve(&source);
            drop(permit);
            (source, resolved)
        }));
    }

    let mut resolved = HashMap::with_capacity(tasks.len());
    for task in tasks {
        let (source, path) = task.await?;
        resolved.insert(source, path);
    }
    Ok(resolved)
}

fn write_page(path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, html)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKBOOK: &str = r#"{"sheets": [
        {"name": "Intro", "rows": [
            ["comment", "filename", "start", "commands"],
            [null, "a.mp4", null, "15", "rate 2", "30"]
        ]},
        {"name": "Outro", "rows": [
            ["comment", "filename", "start", "commands"],
            [null, null, "Thanks", "Questions?"]
        ]}
    ]}"#;

    #[test]
    fn test_replacement_pairs() {
        let pairs = replacement_pairs(vec![
            "/mnt/user".to_string(),
            "/mnt/foo".to_string(),
            "jpg".to_string(),
            "JPG".to_string(),
        ])
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("/mnt/user".to_string(), "/mnt/foo".to_string()),
                ("jpg".to_string(), "JPG".to_string())
            ]
        );
        assert!(replacement_pairs(vec!["odd".to_string()]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = AppConfig::default();
        config.filenames.search_dirs.push(PathBuf::from("/configured"));
        let options = BuildOptions {
            search_dirs: vec![PathBuf::from("/flag")],
            convert: true,
            no_autogenerate: true,
            cache_dir: Some(PathBuf::from("/var/cache/slidershow")),
            ..BuildOptions::default()
        };
        apply_overrides(&mut config, &options);

        assert_eq!(
            config.filenames.search_dirs,
            vec![PathBuf::from("/configured"), PathBuf::from("/flag")]
        );
        assert!(config.convert.enable);
        assert!(!config.convert.autogenerate);
        assert!(config.convert.check_mp4_for_hevc);
        assert_eq!(
            config.convert.cache_dir,
            PathBuf::from("/var/cache/slidershow")
        );
    }

    #[tokio::test]
    async fn test_build_writes_one_page_per_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("talk.json");
        std::fs::write(&file, WORKBOOK).unwrap();

        let options = BuildOptions {
            file,
            output: Some(dir.path().join("out").join("talk.html")),
            ..BuildOptions::default()
        };
        run(AppConfig::default(), options).await.unwrap();

        let intro = std::fs::read_to_string(dir.path().join("out/talk_Intro.html")).unwrap();
        assert!(intro.contains(r#"data-video-points='[[15, "rate:2"],[30, "pause"]]'"#));
        let outro = std::fs::read_to_string(dir.path().join("out/talk_Outro.html")).unwrap();
        assert!(outro.contains("<h1>Thanks</h1><p>Questions?</p>"));
    }

    #[tokio::test]
    async fn test_single_sheet_keeps_output_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("talk.json");
        std::fs::write(&file, WORKBOOK).unwrap();
        let output = dir.path().join("talk.html");

        let options = BuildOptions {
            file,
            sheet: Some("Outro".to_string()),
            output: Some(output.clone()),
            ..BuildOptions::default()
        };
        run(AppConfig::default(), options).await.unwrap();

        assert!(output.exists());
        assert!(!dir.path().join("talk_Outro.html").exists());
    }

    #[tokio::test]
    async fn test_unknown_sheet_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("talk.json");
        std::fs::write(&file, WORKBOOK).unwrap();

        let options = BuildOptions {
            file,
            sheet: Some("Missing".to_string()),
            ..BuildOptions::default()
        };
        assert!(run(AppConfig::default(), options).await.is_err());
    }
}

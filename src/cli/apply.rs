//! `sieve apply`: run filters over asset files.
//!
//! Each asset is processed independently: a failing asset is reported and
//! skipped, the others still go through. Results land flat in the cache-output
//! directory, which is the layout the css filter's `../` prefix assumes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashSet;

use sieve::asset::LoadPathResolver;
use sieve::config::SieveConfig;
use sieve::filter::{CssUrlFilter, Filter, FilterContext, TemplateFilter};
use sieve::logger::{status_error, status_success};
use sieve::{debug, log};

use super::{ApplyArgs, FilterKind};

/// One asset and the filters to run on it.
struct Job {
    path: PathBuf,
    kinds: Vec<FilterKind>,
}

/// Filters shared by all assets of one run, so the template compiler is
/// built at most once.
struct Filters {
    template: Option<TemplateFilter>,
    css: CssUrlFilter<LoadPathResolver>,
}

impl Filters {
    fn new(config: &SieveConfig, needs_template: bool) -> Result<Self> {
        let template = if needs_template {
            Some(TemplateFilter::from_options(&config.options, config.get_root())?)
        } else {
            None
        };
        Ok(Self {
            template,
            css: CssUrlFilter::new(config.resolver()),
        })
    }

    fn get(&mut self, kind: FilterKind) -> Option<&mut dyn Filter> {
        match kind {
            FilterKind::Template => self.template.as_mut().map(|f| f as &mut dyn Filter),
            FilterKind::Css => Some(&mut self.css as &mut dyn Filter),
        }
    }
}

/// Run the apply command.
pub fn run_apply(args: &ApplyArgs, config: &SieveConfig) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let jobs: Vec<Result<Job>> = args
        .paths
        .iter()
        .map(|path| plan_job(&cwd.join(path), &args.filters))
        .collect();

    let needs_template = jobs
        .iter()
        .flatten()
        .any(|job| job.kinds.contains(&FilterKind::Template));
    let mut filters = Filters::new(config, needs_template)?;
    let resolver = config.resolver();
    let mut written = FxHashSet::default();

    log!("apply"; "processing {} assets", jobs.len());
    let mut failed = 0;
    for (job, path) in jobs.into_iter().zip(&args.paths) {
        let result = job.and_then(|job| {
            let output = if args.print { None } else { Some(&mut written) };
            process(&job, &mut filters, &resolver, config, output)
        });
        match result {
            Ok(Some(output)) => status_success(&format!(
                "{} -> {}",
                path.display(),
                config.root_relative(&output).display()
            )),
            Ok(None) => {}
            Err(err) => {
                failed += 1;
                status_error(&path.display().to_string(), &format!("{err:#}"));
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} assets failed", args.paths.len());
    }
    Ok(())
}

/// Decide which filters run on `path`.
fn plan_job(path: &Path, requested: &[FilterKind]) -> Result<Job> {
    let kinds = if requested.is_empty() {
        match FilterKind::for_path(path) {
            Some(kind) => vec![kind],
            None => bail!("no default filter for '{}', pass --filter", path.display()),
        }
    } else {
        requested.to_vec()
    };
    Ok(Job {
        path: path.to_path_buf(),
        kinds,
    })
}

/// Run one asset through its filters.
///
/// With `written`, the result goes to the cache-output directory and its path
/// is recorded there; a path already recorded by an earlier asset is an error.
/// Without it, the result is printed to stdout.
///
/// Returns the written output path, or `None` when printing.
fn process(
    job: &Job,
    filters: &mut Filters,
    resolver: &LoadPathResolver,
    config: &SieveConfig,
    written: Option<&mut FxHashSet<PathBuf>>,
) -> Result<Option<PathBuf>> {
    let identity = resolver.identity_of(&job.path).with_context(|| {
        format!(
            "'{}' is not inside any asset load path",
            job.path.display()
        )
    })?;
    let mut content = fs::read_to_string(&job.path)
        .with_context(|| format!("Failed to read '{}'", job.path.display()))?;

    let ctx = FilterContext::for_asset(&identity, &config.options, &config.vars);
    for &kind in &job.kinds {
        let filter = filters
            .get(kind)
            .with_context(|| format!("filter {kind:?} is not available"))?;
        debug!("apply"; "{} <- {}", identity, filter.name());
        content = filter.apply(&content, &identity, &ctx)?;
    }

    let Some(written) = written else {
        print!("{content}");
        return Ok(None);
    };

    let output = config.output_dir()?.join(output_name(&identity));
    if written.contains(&output) {
        bail!(
            "output '{}' was already written by another asset in this run",
            config.root_relative(&output).display()
        );
    }
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, content)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;
    written.insert(output.clone());
    Ok(Some(output))
}

/// File name of a processed asset: templates become HTML.
fn output_name(identity: &str) -> String {
    let name = identity.rsplit('/').next().unwrap_or(identity);
    match name.strip_suffix(".haml") {
        Some(stem) => format!("{stem}.html"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, SieveConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("assets/styles/img")).unwrap();
        fs::create_dir_all(root.join("assets/views")).unwrap();
        fs::write(root.join("assets/styles/img/a.png"), b"png").unwrap();
        fs::write(
            root.join("assets/styles/main.css"),
            "a { background: url(img/a.png); }",
        )
        .unwrap();
        fs::write(root.join("assets/views/index.haml"), "%h1= title").unwrap();

        let mut config = SieveConfig::from_str(
            r#"
[options]
cache_directory = "cache/out"
template_cache = ".sieve/templates"

[vars]
title = "Home"
"#,
        )
        .unwrap();
        config.set_root(root);
        (dir, config)
    }

    fn job(path: PathBuf) -> Job {
        plan_job(&path, &[]).unwrap()
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("views/index.haml"), "index.html");
        assert_eq!(output_name("styles/main.css"), "main.css");
        assert_eq!(output_name("top.css"), "top.css");
    }

    #[test]
    fn test_plan_job() {
        assert_eq!(job(PathBuf::from("a.css")).kinds, vec![FilterKind::Css]);
        assert!(plan_job(Path::new("a.png"), &[]).is_err());
        let explicit = plan_job(Path::new("a.png"), &[FilterKind::Css]).unwrap();
        assert_eq!(explicit.kinds, vec![FilterKind::Css]);
    }

    #[test]
    fn test_process_css_and_template() {
        let (dir, config) = project();
        let resolver = config.resolver();
        let mut filters = Filters::new(&config, true).unwrap();
        let mut written = FxHashSet::default();

        let css = job(dir.path().join("assets/styles/main.css"));
        let out = process(&css, &mut filters, &resolver, &config, Some(&mut written))
            .unwrap()
            .unwrap();
        assert_eq!(out, dir.path().join("cache/out/main.css"));
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "a { background: url(../../assets/styles/img/a.png); }"
        );

        let haml = job(dir.path().join("assets/views/index.haml"));
        let out = process(&haml, &mut filters, &resolver, &config, Some(&mut written))
            .unwrap()
            .unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "<h1>Home</h1>\n");
        assert!(dir.path().join(".sieve/templates/views/index.haml").is_file());
    }

    #[test]
    fn test_same_output_name_is_not_overwritten() {
        let (dir, config) = project();
        fs::create_dir_all(dir.path().join("assets/a")).unwrap();
        fs::create_dir_all(dir.path().join("assets/b")).unwrap();
        fs::write(dir.path().join("assets/a/main.css"), "A").unwrap();
        fs::write(dir.path().join("assets/b/main.css"), "B").unwrap();
        let resolver = config.resolver();
        let mut filters = Filters::new(&config, false).unwrap();
        let mut written = FxHashSet::default();

        let first = job(dir.path().join("assets/a/main.css"));
        let out = process(&first, &mut filters, &resolver, &config, Some(&mut written))
            .unwrap()
            .unwrap();

        let second = job(dir.path().join("assets/b/main.css"));
        let err = process(&second, &mut filters, &resolver, &config, Some(&mut written))
            .unwrap_err();

        assert!(err.to_string().contains("already written"));
        assert_eq!(fs::read_to_string(&out).unwrap(), "A");
    }

    #[test]
    fn test_run_apply_reports_output_collision() {
        let (dir, config) = project();
        fs::create_dir_all(dir.path().join("assets/a")).unwrap();
        fs::create_dir_all(dir.path().join("assets/b")).unwrap();
        fs::write(dir.path().join("assets/a/main.css"), "A").unwrap();
        fs::write(dir.path().join("assets/b/main.css"), "B").unwrap();

        let args = ApplyArgs {
            paths: vec![
                dir.path().join("assets/a/main.css"),
                dir.path().join("assets/b/main.css"),
                dir.path().join("assets/views/index.haml"),
            ],
            filters: vec![],
            print: false,
        };
        let err = run_apply(&args, &config).unwrap_err();

        assert!(err.to_string().contains("1 of 3"));
        let out = dir.path().join("cache/out");
        assert_eq!(fs::read_to_string(out.join("main.css")).unwrap(), "A");
        assert_eq!(fs::read_to_string(out.join("index.html")).unwrap(), "<h1>Home</h1>\n");
    }

    #[test]
    fn test_process_outside_load_paths() {
        let (dir, config) = project();
        fs::write(dir.path().join("loose.css"), "").unwrap();
        let resolver = config.resolver();
        let mut filters = Filters::new(&config, false).unwrap();

        let loose = job(dir.path().join("loose.css"));
        assert!(process(&loose, &mut filters, &resolver, &config, None).is_err());
    }

    #[test]
    fn test_template_needs_cache_option() {
        let (_dir, mut config) = project();
        config.options = sieve::config::Options::new().with("cache_directory", "out");
        assert!(Filters::new(&config, true).is_err());
        assert!(Filters::new(&config, false).is_ok());
    }
}

//! Resolve source playlists against a destination-catalog fixture and
//! populate destination playlists (dry run).
//!
//! The real catalog connectors are external collaborators; this binary wires
//! the pipeline to a JSON candidate universe and a printing writer so a whole
//! run can be exercised and inspected offline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use trackbridge::error::CatalogError;
use trackbridge::models::{CandidateRecord, TrackRecord};
use trackbridge::progress::{format_duration, set_log_only};
use trackbridge::resolve::{CatalogSearch, Resolver, SearchKind};
use trackbridge::review::ConsoleReviewer;
use trackbridge::writer::{self, CatalogWriter, Visibility};

#[derive(Parser)]
#[command(name = "trackbridge")]
#[command(about = "Resolve source playlists against a catalog fixture and populate playlists")]
struct Args {
    /// JSON file with source playlists and their tracks
    source: PathBuf,

    /// JSON file with the destination catalog candidate universe
    catalog: PathBuf,

    /// Resolve albums instead of tracks and add them to the library
    #[arg(long)]
    albums: bool,

    /// Hide progress bars for tail-friendly output
    #[arg(long)]
    log_only: bool,
}

// ============================================================================
// Fixture Input
// ============================================================================

#[derive(Deserialize)]
struct SourcePlaylist {
    title: String,
    tracks: Vec<SourceTrack>,
}

#[derive(Deserialize)]
struct SourceTrack {
    title: String,
    #[serde(default)]
    artists: Vec<String>,
    #[serde(default)]
    duration: Option<String>,
}

#[derive(Deserialize, Default)]
struct CatalogFixture {
    #[serde(default)]
    tracks: Vec<CandidateRecord>,
    #[serde(default)]
    albums: Vec<CandidateRecord>,
}

/// Deterministic in-process stand-in for the destination search endpoint:
/// candidates sharing the most query words win, ties keep fixture order.
struct FixtureCatalog {
    fixture: CatalogFixture,
}

impl CatalogSearch for FixtureCatalog {
    fn search(
        &self,
        query: &str,
        kind: SearchKind,
        limit: usize,
    ) -> Result<Vec<CandidateRecord>, CatalogError> {
        let pool = match kind {
            SearchKind::Track => &self.fixture.tracks,
            SearchKind::Album => &self.fixture.albums,
        };
        let query_lower = query.to_lowercase();
        let words: Vec<&str> = query_lower.split_whitespace().collect();

        let mut hits: Vec<(usize, &CandidateRecord)> = pool
            .iter()
            .filter_map(|c| {
                let haystack = format!("{} {}", c.title, c.artists_joined()).to_lowercase();
                let matched = words.iter().filter(|w| haystack.contains(*w)).count();
                (matched > 0).then_some((matched, c))
            })
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(hits.into_iter().take(limit).map(|(_, c)| c.clone()).collect())
    }
}

/// Printing writer: records nothing remotely, synthesizes local playlist ids.
#[derive(Default)]
struct DryRunWriter {
    playlists: usize,
}

impl CatalogWriter for DryRunWriter {
    fn create_playlist(
        &mut self,
        title: &str,
        _visibility: Visibility,
    ) -> Result<String, CatalogError> {
        self.playlists += 1;
        let id = format!("local-playlist-{}", self.playlists);
        println!("create playlist '{}' -> {}", title, id);
        Ok(id)
    }

    fn add_items(&mut self, playlist_id: &str, ids: &[String]) -> Result<(), CatalogError> {
        println!("add {} items to {}", ids.len(), playlist_id);
        Ok(())
    }

    fn add_to_library(&mut self, ids: &[String]) -> Result<(), CatalogError> {
        println!("add {} albums to library", ids.len());
        Ok(())
    }
}

fn load_source(path: &Path) -> Result<Vec<TrackRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file {:?}", path))?;
    let playlists: Vec<SourcePlaylist> =
        serde_json::from_str(&raw).context("Failed to parse source playlists")?;

    let mut records = Vec::new();
    for playlist in playlists {
        for track in playlist.tracks {
            records.push(TrackRecord {
                title: track.title,
                artists: track.artists,
                duration: track.duration,
                playlist_title: playlist.title.clone(),
            });
        }
    }
    Ok(records)
}

fn load_catalog(path: &Path) -> Result<CatalogFixture> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file {:?}", path))?;
    serde_json::from_str(&raw).context("Failed to parse catalog fixture")
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);
    let start = Instant::now();

    // Failure to load either side is the connectivity analog: fatal.
    let records = load_source(&args.source)?;
    let fixture = load_catalog(&args.catalog)?;
    println!(
        "Loaded {} source tracks, {} track / {} album candidates",
        records.len(),
        fixture.tracks.len(),
        fixture.albums.len()
    );

    let catalog = FixtureCatalog { fixture };
    let resolver = Resolver::new(&catalog);
    let mut dry_run = DryRunWriter::default();

    if args.albums {
        let mut reviewer = ConsoleReviewer;
        let resolution = resolver.resolve_albums(&records, &mut reviewer);
        resolution.report.print_summary();
        resolution.report.stats.log_phase("albums");
        let added = writer::add_albums_to_library(&mut dry_run, &resolution.confirmed_ids);
        println!("Added {} albums to library", added);
    } else {
        let (results, report) = resolver.resolve_tracks(&records);
        report.print_summary();
        report.stats.log_phase("tracks");
        let entries = writer::resolved_entries(&records, &results);
        let summary = writer::write_playlists(&mut dry_run, &entries);
        println!(
            "Created {} playlists, added {} tracks, skipped {} playlists",
            summary.playlists_created,
            summary.items_added,
            summary.skipped_playlists.len()
        );
    }

    println!("Completed in {}", format_duration(start.elapsed()));
    Ok(())
}

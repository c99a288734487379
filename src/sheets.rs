// File: ./src/sheets.rs
//! Turns the raw record tables into typed events, parkrun weeks, tags and
//! series.
use crate::config::Config;
use crate::model::link::{Link, parse_links};
use crate::model::name::{Name, sanitize_name, sort_and_uniquify, split_list, split_pair};
use crate::model::time_range::parse_date;
use crate::model::{Event, EventKind, Location, ParkrunEvent, Serie, Tag, TimeRange};
use crate::source::RecordSource;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Typed records of all tables, before any organizing pass.
#[derive(Debug, Default)]
pub struct SheetsData {
    pub events: Vec<Event>,
    pub groups: Vec<Event>,
    pub shops: Vec<Event>,
    pub parkrun: Vec<ParkrunEvent>,
    pub tags: Vec<Tag>,
    pub series: Vec<Serie>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SheetNames {
    pub events: Vec<String>,
    pub groups: String,
    pub shops: String,
    pub parkrun: String,
    pub tags: String,
    pub series: String,
}

/// Column title to index, from the header row.
#[derive(Debug, Default)]
pub struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    pub fn new(header: &[String]) -> Result<Self> {
        let mut index = HashMap::new();
        for (col, title) in header.iter().enumerate() {
            if let Some(existing) = index.insert(title.clone(), col) {
                bail!("duplicate title '{}' in columns {} and {}", title, existing, col);
            }
        }
        Ok(Self { index })
    }

    /// Cell of the titled column; short rows read as empty.
    pub fn get_val<'a>(&self, title: &str, row: &'a [String]) -> Result<&'a str> {
        let col = *self
            .index
            .get(title)
            .ok_or_else(|| anyhow!("missing column '{}'", title))?;
        Ok(row.get(col).map(String::as_str).unwrap_or(""))
    }

    /// `LINK1`, `LINK2`, ... up to the first missing column.
    pub fn get_links(&self, row: &[String]) -> Vec<String> {
        (1..)
            .map_while(|i| self.get_val(&format!("LINK{}", i), row).ok())
            .map(str::to_string)
            .collect()
    }
}

pub fn find_sheet_names(sheets: &[String]) -> Result<SheetNames> {
    let mut names = SheetNames::default();
    for sheet in sheets {
        match sheet.as_str() {
            s if s.starts_with("Events") => names.events.push(s.to_string()),
            "Groups" => names.groups = sheet.clone(),
            "Shops" => names.shops = sheet.clone(),
            "Parkrun" => names.parkrun = sheet.clone(),
            "Tags" => names.tags = sheet.clone(),
            "Series" => names.series = sheet.clone(),
            s if s.contains("ignore") => {}
            s => log::info!("ignoring unknown sheet: '{}'", s),
        }
    }
    if names.events.is_empty() {
        bail!("fetching sheets: unable to find any 'Events' sheet");
    }
    for (title, found) in [
        ("Groups", &names.groups),
        ("Shops", &names.shops),
        ("Parkrun", &names.parkrun),
        ("Tags", &names.tags),
        ("Series", &names.series),
    ] {
        if found.is_empty() {
            bail!("fetching sheets: unable to find '{}' sheet", title);
        }
    }
    Ok(names)
}

fn fetch_table(source: &dyn RecordSource, table: &str) -> Result<(Columns, Vec<Vec<String>>)> {
    let mut grid = source.fetch_table(table)?;
    if grid.is_empty() {
        bail!("got 0 rows when fetching table '{}'", table);
    }
    let header = grid.remove(0);
    let cols = Columns::new(&header)
        .with_context(|| format!("failed to parse rows when fetching table '{}'", table))?;
    Ok((cols, grid))
}

struct EventRow<'a> {
    date: &'a str,
    name: &'a str,
    name2: &'a str,
    seo: &'a str,
    status: &'a str,
    url: &'a str,
    description: &'a str,
    location: &'a str,
    coordinates: &'a str,
    registration: &'a str,
    tags: &'a str,
    links: Vec<String>,
}

impl<'a> EventRow<'a> {
    fn read(cols: &Columns, row: &'a [String]) -> Result<Self> {
        Ok(Self {
            date: cols.get_val("DATE", row)?,
            name: cols.get_val("NAME", row)?,
            name2: cols.get_val("NAME2", row)?,
            seo: cols.get_val("SEO", row)?,
            status: cols.get_val("STATUS", row)?,
            url: cols.get_val("URL", row)?,
            description: cols.get_val("DESCRIPTION", row)?,
            location: cols.get_val("LOCATION", row)?,
            coordinates: cols.get_val("COORDINATES", row)?,
            registration: cols.get_val("REGISTRATION", row)?,
            tags: cols.get_val("TAGS", row)?,
            links: cols.get_links(row),
        })
    }
}

/// Separates `serie...` entries from ordinary tags.
fn split_tags(cell: &str) -> (Vec<String>, Vec<String>) {
    let mut tags = Vec::new();
    let mut series = Vec::new();
    for t in split_list(cell) {
        if t.starts_with("serie") {
            match t.get(6..).map(str::trim).filter(|s| !s.is_empty()) {
                Some(serie) => series.push(serie.to_string()),
                None => log::warn!("ignoring series tag '{}' without a series name", t),
            }
        } else {
            tags.push(sanitize_name(&t));
        }
    }
    (tags, series)
}

fn fetch_events(
    source: &dyn RecordSource,
    config: &Config,
    today: NaiveDate,
    kind: EventKind,
    table: &str,
) -> Result<Vec<Event>> {
    let (cols, rows) = fetch_table(source, table)?;

    let mut events = Vec::new();
    for (line, row) in rows.iter().enumerate() {
        let data = EventRow::read(&cols, row)
            .with_context(|| format!("table '{}', line '{}'", table, line))?;

        let flags = config.status.decode(data.status);
        if flags.temp {
            log::warn!("table '{}', line '{}': skipping row with temp status", table, line);
            continue;
        }
        if kind == EventKind::Event && data.date.is_empty() {
            log::warn!("table '{}', line '{}': skipping row with empty date", table, line);
            continue;
        }
        if data.name.is_empty() {
            log::warn!("table '{}', line '{}': skipping row with empty name", table, line);
            continue;
        }
        if !data.name.contains(data.name2) {
            log::warn!(
                "table '{}', line '{}': name '{}' does not contain name2 '{}'",
                table,
                line,
                data.name,
                data.name2
            );
        }
        if data.url.is_empty() {
            log::warn!("table '{}', line '{}': skipping row with empty url", table, line);
            continue;
        }

        let (name, name_old) = split_pair(data.name);
        let (details, details2) = split_pair(data.description);
        let (mut tags, series) = split_tags(data.tags);
        let location = Location::new(&config.city, data.location, data.coordinates);
        tags.extend(location.tags());

        let time = TimeRange::parse(data.date).unwrap_or_else(|(unset, e)| {
            log::warn!("event '{}': {}", name, e);
            unset
        });
        let links = parse_links(&data.links, data.registration)
            .with_context(|| format!("parsing links of event '{}'", name))?;

        let mut event = Event::new(kind, &name);
        event.name_old = Name::new(&name_old);
        event.old = time.is_before(today);
        event.time = time;
        event.status = flags.status;
        event.cancelled = flags.cancelled;
        event.obsolete = flags.obsolete;
        event.special = flags.special;
        event.location = location;
        event.details = details;
        event.details2 = details2;
        event.main_link = Some(Link::unnamed(data.url));
        event.links = links;
        event.raw_tags = sort_and_uniquify(tags);
        event.raw_series = series;
        event.meta.base_name = Name::new(data.name2);
        event.meta.seo_title = data.seo.to_string();
        events.push(event);
    }
    Ok(events)
}

fn is_current_week(date: &str, today: NaiveDate) -> bool {
    match parse_date(date) {
        Ok(d) => today == d || (today > d && today < d + Duration::days(7)),
        Err(_) => false,
    }
}

fn fetch_parkrun(
    source: &dyn RecordSource,
    config: &Config,
    today: NaiveDate,
    table: &str,
) -> Result<Vec<ParkrunEvent>> {
    let (cols, rows) = fetch_table(source, table)?;
    let mut weeks = Vec::with_capacity(rows.len());
    for row in &rows {
        let read = |title: &str| -> Result<String> {
            cols.get_val(title, row)
                .map(str::to_string)
                .with_context(|| format!("table '{}'", table))
        };
        let mut week = ParkrunEvent {
            date: read("DATE")?,
            index: read("INDEX")?,
            runners: read("RUNNERS")?,
            temperature: read("TEMP")?,
            special: read("SPECIAL")?,
            cafe: read("CAFE")?,
            results: read("RESULTS")?,
            report: read("REPORT")?,
            author: read("AUTHOR")?,
            photos: read("PHOTOS")?,
            current_week: false,
        };
        if !week.temperature.is_empty() {
            week.temperature.push_str("°C");
        }
        if !week.results.is_empty() {
            week.results = format!("{}{}", config.parkrun_results_url, week.results);
        }
        // only real runs carry an index
        week.current_week = !week.index.is_empty() && is_current_week(&week.date, today);
        weeks.push(week);
    }
    Ok(weeks)
}

fn fetch_tags(source: &dyn RecordSource, table: &str) -> Result<Vec<Tag>> {
    let (cols, rows) = fetch_table(source, table)?;
    let mut tags = Vec::new();
    for row in &rows {
        let ctx = || format!("table '{}'", table);
        let tag = sanitize_name(cols.get_val("TAG", row).with_context(ctx)?);
        let name = cols.get_val("NAME", row).with_context(ctx)?;
        let description = cols.get_val("DESCRIPTION", row).with_context(ctx)?;
        if !tag.is_empty() && (!name.is_empty() || !description.is_empty()) {
            tags.push(Tag {
                name: Name::with_id(name, &tag),
                description: description.to_string(),
                ..Default::default()
            });
        }
    }
    Ok(tags)
}

fn fetch_series(source: &dyn RecordSource, table: &str) -> Result<Vec<Serie>> {
    let (cols, rows) = fetch_table(source, table)?;
    let mut series = Vec::with_capacity(rows.len());
    for row in &rows {
        let ctx = || format!("table '{}'", table);
        let name = cols.get_val("NAME", row).with_context(ctx)?;
        let description = cols.get_val("DESCRIPTION", row).with_context(ctx)?;
        let links = parse_links(&cols.get_links(row), "")
            .with_context(|| format!("parsing links of series '{}'", name))?;
        let mut serie = Serie::new(name);
        serie.description = description.to_string();
        serie.links = links;
        series.push(serie);
    }
    Ok(series)
}

/// Reads every table of `source`. Structural problems are fatal, bad rows are
/// skipped with a warning.
pub fn load_sheets(source: &dyn RecordSource, config: &Config, today: NaiveDate) -> Result<SheetsData> {
    let names = find_sheet_names(&source.table_names().context("fetching all sheets")?)?;

    let mut events = Vec::new();
    for table in &names.events {
        events.extend(
            fetch_events(source, config, today, EventKind::Event, table).context("fetching events")?,
        );
    }
    let groups = fetch_events(source, config, today, EventKind::Group, &names.groups)
        .context("fetching groups")?;
    let shops = fetch_events(source, config, today, EventKind::Shop, &names.shops)
        .context("fetching shops")?;
    let parkrun =
        fetch_parkrun(source, config, today, &names.parkrun).context("fetching parkrun events")?;
    let tags = fetch_tags(source, &names.tags).context("fetching tags")?;
    let series = fetch_series(source, &names.series).context("fetching series")?;

    Ok(SheetsData {
        events,
        groups,
        shops,
        parkrun,
        tags,
        series,
    })
}

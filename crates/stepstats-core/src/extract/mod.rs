//! Record extraction from high-score XML documents.
//!
//! A document holds any number of `HighScoreForASongAndSteps` entries at any
//! depth below the root element. Each entry may carry three children:
//!
//! - `Song` with a `Dir` attribute
//! - `Steps` with `Difficulty` and `StepsType` attributes
//! - `HighScore` with the score payload
//!
//! Entries without a `HighScore` are skipped. Every other entry becomes one
//! [`Row`], built in this order:
//!
//! 1. `song_dir`, `difficulty`, `steps_type` (null when the element is missing)
//! 2. one column per direct `HighScore` child, named by its lowercased tag
//! 3. one prefixed column per child of `TapNoteScores`, `HoldNoteScores`
//!    and `RadarValues` (see [`ScoreGroup`])
//!
//! Keys written later overwrite earlier ones with the same name.

mod decode;
mod group;

pub use decode::decode_document;
pub use group::ScoreGroup;

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::{Error, Result};
use crate::row::Row;
use crate::value::{Value, coerce};

/// Element name of one score entry
pub const ENTRY_TAG: &str = "HighScoreForASongAndSteps";
pub const SONG_TAG: &str = "Song";
pub const STEPS_TAG: &str = "Steps";
pub const HIGH_SCORE_TAG: &str = "HighScore";

/// Identity columns written at the start of every row
pub const SONG_DIR_COLUMN: &str = "song_dir";
pub const DIFFICULTY_COLUMN: &str = "difficulty";
pub const STEPS_TYPE_COLUMN: &str = "steps_type";

fn parsing_options() -> ParsingOptions {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

/// Extract one row per valid entry, in document order
pub fn extract_rows(doc: &Document) -> Vec<Row> {
    doc.root_element()
        .descendants()
        .skip(1)
        .filter(|node| node.is_element() && node.has_tag_name(ENTRY_TAG))
        .filter_map(extract_entry)
        .collect()
}

/// Parse document text and extract its rows
pub fn parse_document(text: &str) -> Result<Vec<Row>> {
    let doc = Document::parse_with_options(text, parsing_options()).map_err(Error::xml_inline)?;
    Ok(extract_rows(&doc))
}

/// Read, decode and parse one file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let text = decode_document(&bytes);

    let doc = Document::parse_with_options(&text, parsing_options()).map_err(|e| Error::Xml {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let rows = extract_rows(&doc);
    debug!("{}: {} rows", path.display(), rows.len());
    Ok(rows)
}

fn extract_entry(entry: Node) -> Option<Row> {
    let high_score = child_element(entry, HIGH_SCORE_TAG)?;
    let song = child_element(entry, SONG_TAG);
    let steps = child_element(entry, STEPS_TAG);

    let mut row = Row::new();
    row.insert(SONG_DIR_COLUMN, attribute(song, "Dir"));
    row.insert(DIFFICULTY_COLUMN, attribute(steps, "Difficulty"));
    row.insert(STEPS_TYPE_COLUMN, attribute(steps, "StepsType"));

    for child in child_elements(high_score) {
        let tag = child.tag_name().name();
        if ScoreGroup::is_group_tag(tag) {
            continue;
        }
        row.insert(tag.to_lowercase(), coerce(leading_text(child).as_deref()));
    }

    for group in ScoreGroup::iter() {
        let Some(section) = child_element(high_score, group.tag()) else {
            continue;
        };
        for child in child_elements(section) {
            let value = coerce(leading_text(child).as_deref());
            row.insert(group.column(child.tag_name().name()), value);
        }
    }

    Some(row)
}

/// First direct child element with the given tag
fn child_element<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.has_tag_name(tag))
}

fn child_elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

/// Text before the first child element, with comments and processing
/// instructions skipped. `None` when there is no text node at all.
fn leading_text(node: Node) -> Option<String> {
    let mut text: Option<String> = None;
    for child in node.children().take_while(|child| !child.is_element()) {
        if let Some(part) = child.text().filter(|_| child.is_text()) {
            text.get_or_insert_with(String::new).push_str(part);
        }
    }
    text
}

/// Attribute value as text, null when the element or attribute is missing
fn attribute(node: Option<Node>, name: &str) -> Value {
    Value::from(node.and_then(|n| n.attribute(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(body: &str) -> String {
        format!(
            "<Stats><SongScores><Song Dir=\"Songs/Pack/SongA/\"><Steps Difficulty=\"Hard\" StepsType=\"dance-single\">\
             <HighScoreList/></Steps></Song></SongScores>\
             <RecentSongScores><HighScoreForASongAndSteps>{}</HighScoreForASongAndSteps></RecentSongScores></Stats>",
            body
        )
    }

    #[test]
    fn test_full_entry() {
        let xml = entry(
            "<Song Dir=\"SongA\"/>\
             <Steps Difficulty=\"Hard\" StepsType=\"dance-single\"/>\
             <HighScore><Name>EVIL</Name><Grade>Tier02</Grade><Score>12345</Score>\
             <PercentDP>0.954321</PercentDP>\
             <TapNoteScores><W1>10</W1><Miss>0</Miss></TapNoteScores>\
             <HoldNoteScores><Held>4</Held></HoldNoteScores>\
             <RadarValues><Stream>0.5</Stream></RadarValues>\
             </HighScore>",
        );
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows.len(), 1);

        let row = &rows[0];
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(
            keys,
            vec![
                "song_dir",
                "difficulty",
                "steps_type",
                "name",
                "grade",
                "score",
                "percentdp",
                "tapnotescores_w1",
                "tapnotescores_miss",
                "holdnotescores_held",
                "radarvalues_stream",
            ]
        );
        assert_eq!(row.get("song_dir"), Some(&Value::from("SongA")));
        assert_eq!(row.get("difficulty"), Some(&Value::from("Hard")));
        assert_eq!(row.get("steps_type"), Some(&Value::from("dance-single")));
        assert_eq!(row.get("score"), Some(&Value::Int(12345)));
        assert_eq!(row.get("percentdp"), Some(&Value::Float(0.954321)));
        assert_eq!(row.get("tapnotescores_w1"), Some(&Value::Int(10)));
        assert_eq!(row.get("radarvalues_stream"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_entry_without_high_score_is_skipped() {
        let xml = entry(
            "<Song Dir=\"SongA\"/><Steps Difficulty=\"Hard\" StepsType=\"dance-single\"/>",
        );
        assert!(parse_document(&xml).unwrap().is_empty());

        let xml = entry("");
        assert!(parse_document(&xml).unwrap().is_empty());
    }

    #[test]
    fn test_missing_song_and_steps_are_null() {
        let xml = entry("<HighScore><Score>1</Score></HighScore>");
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("song_dir"), Some(&Value::Null));
        assert_eq!(rows[0].get("difficulty"), Some(&Value::Null));
        assert_eq!(rows[0].get("steps_type"), Some(&Value::Null));
        assert_eq!(rows[0].get("score"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_missing_attribute_is_null() {
        let xml = entry("<Song/><Steps Difficulty=\"Easy\"/><HighScore/>");
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows[0].get("song_dir"), Some(&Value::Null));
        assert_eq!(rows[0].get("difficulty"), Some(&Value::from("Easy")));
        assert_eq!(rows[0].get("steps_type"), Some(&Value::Null));
        assert_eq!(rows[0].len(), 3);
    }

    #[test]
    fn test_group_prefixing() {
        let xml = entry("<HighScore><TapNoteScores><W1>10</W1></TapNoteScores></HighScore>");
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows[0].get("tapnotescores_w1"), Some(&Value::Int(10)));
        assert!(!rows[0].contains_key("tapnotescores"));
    }

    #[test]
    fn test_group_collision_last_write_wins() {
        let xml = entry(
            "<HighScore><TapNoteScores_W1>1</TapNoteScores_W1>\
             <TapNoteScores><W1>2</W1></TapNoteScores></HighScore>",
        );
        let rows = parse_document(&xml).unwrap();
        let row = &rows[0];
        assert_eq!(row.get("tapnotescores_w1"), Some(&Value::Int(2)));
        // Overwrite keeps the first position
        let keys: Vec<&str> = row.keys().collect();
        assert_eq!(keys[3], "tapnotescores_w1");
        assert_eq!(row.len(), 4);
    }

    #[test]
    fn test_top_level_field_can_overwrite_identity_column() {
        let xml = entry("<Song Dir=\"SongA\"/><HighScore><Song_Dir>Other</Song_Dir></HighScore>");
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows[0].get("song_dir"), Some(&Value::from("Other")));
    }

    #[test]
    fn test_empty_element_is_null() {
        let xml = entry("<HighScore><Modifiers></Modifiers><Name/></HighScore>");
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows[0].get("modifiers"), Some(&Value::Null));
        assert_eq!(rows[0].get("name"), Some(&Value::Null));
    }

    #[test]
    fn test_text_around_comments_is_joined() {
        let xml = entry(
            "<HighScore><Score><!-- c -->5</Score><Grade>12<!--x-->34</Grade>\
             <Name><?pi x?>EV<![CDATA[IL]]></Name><Modifiers><!-- none --></Modifiers>\
             <RadarValues><Stream>0.<!-- y -->5<Extra/>9</Stream></RadarValues></HighScore>",
        );
        let rows = parse_document(&xml).unwrap();
        let row = &rows[0];
        assert_eq!(row.get("score"), Some(&Value::Int(5)));
        assert_eq!(row.get("grade"), Some(&Value::Int(1234)));
        assert_eq!(row.get("name"), Some(&Value::from("EVIL")));
        assert_eq!(row.get("modifiers"), Some(&Value::Null));
        // Text after the first child element is tail text and is ignored
        assert_eq!(row.get("radarvalues_stream"), Some(&Value::Float(0.5)));
    }

    #[test]
    fn test_entries_found_at_any_depth_in_order() {
        let xml = "<Stats><A><HighScoreForASongAndSteps><HighScore><Score>1</Score></HighScore>\
                   </HighScoreForASongAndSteps></A><B><C><HighScoreForASongAndSteps><HighScore>\
                   <Score>2</Score></HighScore></HighScoreForASongAndSteps></C></B></Stats>";
        let rows = parse_document(xml).unwrap();
        let scores: Vec<i64> = rows
            .iter()
            .filter_map(|r| r.get("score").and_then(Value::as_i64))
            .collect();
        assert_eq!(scores, vec![1, 2]);
    }

    #[test]
    fn test_root_element_is_not_an_entry() {
        let xml = "<HighScoreForASongAndSteps><HighScore><Score>1</Score></HighScore>\
                   </HighScoreForASongAndSteps>";
        assert!(parse_document(xml).unwrap().is_empty());
    }

    #[test]
    fn test_only_first_child_of_each_kind_is_used() {
        let xml = entry(
            "<Song Dir=\"First\"/><Song Dir=\"Second\"/>\
             <HighScore><Score>1</Score></HighScore><HighScore><Score>2</Score></HighScore>",
        );
        let rows = parse_document(&xml).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("song_dir"), Some(&Value::from("First")));
        assert_eq!(rows[0].get("score"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_document("<Stats><HighScore>").unwrap_err();
        assert!(err.is_malformed_document());
    }

    #[test]
    fn test_parse_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xml");
        fs::write(&path, "<Stats>").unwrap();

        let err = parse_file(&path).unwrap_err();
        match err {
            Error::Xml { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}

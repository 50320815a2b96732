//! Assembles the `info` dict and outer metainfo dict from validated inputs
//! (spec.md §4.6). Grounded on bip_metainfo's
//! `MetainfoBuilder::build_from_file` / `build_from_directory`, rewritten
//! against `forge_bencode::{Bencode, DictBuilder}` instead of the corpus's
//! `ben_map!`/`BTreeMap<&str, Bencode>` construction.

use forge_bencode::{Bencode, DictBuilder};

use crate::file_entry::FileEntry;

/// The fixed identifier embedded as `created by` in every torrent this
/// engine produces (spec.md §4.6), carried over from the project whose
/// metainfo builder this core generalizes.
pub const CREATED_BY: &str = "kimbatt.github.io/torrent-creator";

/// Everything the assembler needs, already validated by
/// [`crate::validate`] and computed by [`crate::pipeline`]. Whether the
/// root was a bare file or a directory can't be recovered from `files`
/// alone (a folder containing exactly one file looks identical to a
/// single-file torrent from the file list), so the caller states it
/// explicitly.
pub struct AssembleInput<'a> {
    pub name: &'a str,
    pub piece_length: u64,
    pub piece_table: Vec<u8>,
    pub files: &'a [FileEntry],
    pub single_file: bool,
    pub private: bool,
    pub source: &'a str,
    pub trackers: &'a [String],
    pub web_seeds: &'a [String],
    pub comment: &'a str,
    pub creation_date: Option<u64>,
}

/// Builds just the `info` dict — the part whose Bencoding feeds the
/// info-hash (spec.md §4.7).
pub fn build_info(input: &AssembleInput<'_>) -> Bencode {
    let mut builder = DictBuilder::new()
        .insert(b"name", input.name)
        .insert(b"piece length", input.piece_length as i64)
        .insert(b"pieces", input.piece_table.clone());

    builder = if input.single_file {
        let length = input.files.first().map(|f| f.size).unwrap_or(0);
        builder.insert(b"length", length as i64)
    } else {
        let file_list: Vec<Bencode> = input
            .files
            .iter()
            .map(|f| {
                DictBuilder::new()
                    .insert(b"length", f.size as i64)
                    .insert(
                        b"path",
                        Bencode::List(f.path.iter().map(|seg| Bencode::from(seg.as_str())).collect()),
                    )
                    .build()
            })
            .collect();
        builder.insert(b"files", Bencode::List(file_list))
    };

    if input.private {
        builder = builder.insert(b"private", 1i64);
    }
    if !input.source.is_empty() {
        builder = builder.insert(b"source", input.source);
    }

    builder.build()
}

/// Builds the full outer dict, embedding [`build_info`]'s result.
pub fn assemble(input: AssembleInput<'_>) -> Bencode {
    let info = build_info(&input);

    let mut builder = DictBuilder::new().insert(b"info", info);

    if let Some(first) = input.trackers.first() {
        builder = builder.insert(b"announce", first.as_str());
        let announce_list: Vec<Bencode> = input
            .trackers
            .iter()
            .map(|t| Bencode::List(vec![Bencode::from(t.as_str())]))
            .collect();
        builder = builder.insert(b"announce-list", Bencode::List(announce_list));
    }

    if !input.web_seeds.is_empty() {
        let url_list: Vec<Bencode> = input.web_seeds.iter().map(|w| Bencode::from(w.as_str())).collect();
        builder = builder.insert(b"url-list", Bencode::List(url_list));
    }

    if !input.comment.is_empty() {
        builder = builder.insert(b"comment", input.comment);
    }

    if let Some(secs) = input.creation_date {
        builder = builder.insert(b"creation date", secs as i64);
    }

    builder = builder.insert(b"created by", CREATED_BY);

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input<'a>(files: &'a [FileEntry], piece_table: Vec<u8>) -> AssembleInput<'a> {
        AssembleInput {
            name: "a.txt",
            piece_length: 16384,
            piece_table,
            files,
            single_file: true,
            private: false,
            source: "",
            trackers: &[],
            web_seeds: &[],
            comment: "",
            creation_date: None,
        }
    }

    #[test]
    fn single_file_mode_sets_length_not_files() {
        let files = vec![FileEntry::in_memory(vec!["a.txt".into()], b"hello".to_vec())];
        let table = forge_hash::hash(b"hello").to_vec();
        let info = build_info(&base_input(&files, table));

        match info {
            Bencode::Dict(dict) => {
                assert!(dict.contains_key(b"length".as_slice()));
                assert!(!dict.contains_key(b"files".as_slice()));
            }
            _ => panic!("expected a dict"),
        }
    }

    #[test]
    fn folder_mode_with_one_file_sets_files_not_length() {
        let files = vec![FileEntry::in_memory(vec!["a.txt".into()], b"hello".to_vec())];
        let table = forge_hash::hash(b"hello").to_vec();
        let mut input = base_input(&files, table);
        input.single_file = false;
        let info = build_info(&input);

        match info {
            Bencode::Dict(dict) => {
                assert!(dict.contains_key(b"files".as_slice()));
                assert!(!dict.contains_key(b"length".as_slice()));
            }
            _ => panic!("expected a dict"),
        }
    }

    #[test]
    fn optional_fields_are_omitted_when_unset() {
        let files = vec![FileEntry::in_memory(vec!["a.txt".into()], b"hello".to_vec())];
        let table = forge_hash::hash(b"hello").to_vec();
        let outer = assemble(base_input(&files, table));

        match outer {
            Bencode::Dict(dict) => {
                assert!(!dict.contains_key(b"announce".as_slice()));
                assert!(!dict.contains_key(b"url-list".as_slice()));
                assert!(!dict.contains_key(b"comment".as_slice()));
                assert!(!dict.contains_key(b"creation date".as_slice()));
                assert!(dict.contains_key(b"created by".as_slice()));
            }
            _ => panic!("expected a dict"),
        }
    }

    #[test]
    fn trackers_populate_announce_and_announce_list_in_order() {
        let files = vec![FileEntry::in_memory(vec!["a.txt".into()], b"hello".to_vec())];
        let table = forge_hash::hash(b"hello").to_vec();
        let trackers = vec![
            "http://one.example/announce".to_owned(),
            "http://two.example/announce".to_owned(),
        ];
        let mut input = base_input(&files, table);
        input.trackers = &trackers;
        let outer = assemble(input);

        match outer {
            Bencode::Dict(dict) => {
                assert_eq!(
                    dict.get(b"announce".as_slice()),
                    Some(&Bencode::from("http://one.example/announce"))
                );
            }
            _ => panic!("expected a dict"),
        }
    }

    #[test]
    fn matches_scenario_s4_info_hash_input() {
        let files = vec![FileEntry::in_memory(vec!["a.txt".into()], b"hello".to_vec())];
        let table = forge_hash::hash(b"hello").to_vec();
        let mut input = base_input(&files, table);
        input.name = "a.txt";
        let info = build_info(&input);
        let encoded = forge_bencode::encode(&info);
        let expected_prefix = b"d6:lengthi5e4:name5:a.txt12:piece lengthi16384e6:pieces20:";
        assert!(encoded.starts_with(expected_prefix));
        assert!(encoded.ends_with(b"e"));
    }
}

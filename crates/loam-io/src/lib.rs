//! Save-file codec: player position plus per-chunk edit overlays.
#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

use loam_blocks::BlockKind;
use loam_edit::EditStore;
use loam_world::BlockPos;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save io: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt save at line {line}: {reason}")]
    Corrupt { line: usize, reason: String },
}

fn corrupt(line: usize, reason: impl Into<String>) -> SaveError {
    SaveError::Corrupt {
        line,
        reason: reason.into(),
    }
}

fn parse_f32(s: &str, line: usize) -> Result<f32, SaveError> {
    s.trim()
        .parse::<f32>()
        .map_err(|_| corrupt(line, format!("expected a number, got {s:?}")))
}

fn parse_i32(s: &str, line: usize) -> Result<i32, SaveError> {
    // Origins written by older sessions may carry a fractional suffix
    // ("15.0"); accept and round rather than reject.
    let t = s.trim();
    if let Ok(v) = t.parse::<i32>() {
        return Ok(v);
    }
    let f = parse_f32(t, line)?;
    Ok(f.round() as i32)
}

/// Decodes the full save text into a store. Empty input yields the
/// defaults; any malformed line rejects the whole file.
pub fn parse_store(content: &str) -> Result<EditStore, SaveError> {
    let mut store = EditStore::new();
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let Some((line_no, player)) = lines.next() else {
        return Ok(store);
    };
    let Some(player) = player.strip_suffix(';') else {
        return Err(corrupt(line_no, "player position line must end with ';'"));
    };
    let parts: Vec<&str> = player.split(',').collect();
    if parts.len() != 3 {
        return Err(corrupt(line_no, "player position needs 3 components"));
    }
    store.set_player_position([
        parse_f32(parts[0], line_no)?,
        parse_f32(parts[1], line_no)?,
        parse_f32(parts[2], line_no)?,
    ]);

    while let Some((line_no, header)) = lines.next() {
        let parts: Vec<&str> = header.split(',').collect();
        if parts.len() != 3 {
            return Err(corrupt(line_no, "chunk origin needs 3 components"));
        }
        let origin = BlockPos::new(
            parse_i32(parts[0], line_no)?,
            parse_i32(parts[1], line_no)?,
            parse_i32(parts[2], line_no)?,
        );

        let mut closed = false;
        for (line_no, row) in lines.by_ref() {
            if row == "*" {
                closed = true;
                break;
            }
            let parts: Vec<&str> = row.split(',').collect();
            if parts.len() != 4 {
                return Err(corrupt(line_no, "edit row needs x,y,z,kind"));
            }
            let pos = BlockPos::new(
                parse_i32(parts[0], line_no)?,
                parse_i32(parts[1], line_no)?,
                parse_i32(parts[2], line_no)?,
            );
            let code = parts[3]
                .trim()
                .parse::<u8>()
                .map_err(|_| corrupt(line_no, "kind code is not an integer"))?;
            let Some(kind) = BlockKind::from_code(code) else {
                return Err(corrupt(line_no, format!("unknown kind code {code}")));
            };
            store.record_edit(origin, pos, kind);
        }
        if !closed {
            return Err(corrupt(line_no, "chunk block not terminated by '*'"));
        }
    }

    Ok(store)
}

/// Encodes a store in the line format `parse_store` reads. Origins and
/// edits are emitted in sorted order so identical stores produce
/// identical files.
pub fn encode_store(store: &EditStore) -> String {
    let [px, py, pz] = store.player_position();
    let mut out = format!("{px},{py},{pz};\n");
    for origin in store.origins() {
        out.push_str(&format!("{},{},{}\n", origin.x, origin.y, origin.z));
        let mut edits = store.edits_for(origin);
        edits.sort_by_key(|(p, _)| *p);
        for (pos, kind) in edits {
            out.push_str(&format!(
                "{},{},{},{}\n",
                pos.x,
                pos.y,
                pos.z,
                kind.code()
            ));
        }
        out.push_str("*\n");
    }
    out
}

/// Loads a store from disk. A missing file is a fresh world, not an
/// error; anything else unreadable or malformed is.
pub fn load_store(path: &Path) -> Result<EditStore, SaveError> {
    match fs::read_to_string(path) {
        Ok(content) => parse_store(&content),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!(target: "io", "no save at {}; starting fresh", path.display());
            Ok(EditStore::new())
        }
        Err(e) => Err(SaveError::Io(e)),
    }
}

pub fn save_store(path: &Path, store: &EditStore) -> Result<(), SaveError> {
    fs::write(path, encode_store(store))?;
    log::info!(
        target: "io",
        "saved {} edits across {} chunks to {}",
        store.stats().block_edits,
        store.stats().origin_entries,
        path.display()
    );
    Ok(())
}

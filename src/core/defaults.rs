//! Built-in preset for the dictionary data layout.
//!
//! `renumber init` writes this preset as renumber.json. The header
//! (`mem-00-header.xml`) and footer (`mem-28-footer.xml`) files hold no
//! entries and are left out of the list.

use crate::config::{CheckpointConfig, RenumberConfig};
use crate::counter::{CounterPolicy, DEFAULT_BASE};

pub const CHECKPOINT_CONSTANT: &str = "ID_OF_FIRST_EXTRA_ENTRY";

pub const CHECKPOINT_FILE: &str = "mem-27-extra.xml";

pub const CHECKPOINT_TARGET: &str =
    "../app/src/main/java/org/tlhInganHol/android/klingonassistant/KlingonContentDatabase.java";

pub const DATA_FILES: &[&str] = &[
    "mem-01-b.xml",
    "mem-02-ch.xml",
    "mem-03-D.xml",
    "mem-04-gh.xml",
    "mem-05-H.xml",
    "mem-06-j.xml",
    "mem-07-l.xml",
    "mem-08-m.xml",
    "mem-09-n.xml",
    "mem-10-ng.xml",
    "mem-11-p.xml",
    "mem-12-q.xml",
    "mem-13-Q.xml",
    "mem-14-r.xml",
    "mem-15-S.xml",
    "mem-16-t.xml",
    "mem-17-tlh.xml",
    "mem-18-v.xml",
    "mem-19-w.xml",
    "mem-20-y.xml",
    "mem-21-a.xml",
    "mem-22-e.xml",
    "mem-23-I.xml",
    "mem-24-o.xml",
    "mem-25-u.xml",
    "mem-26-suffixes.xml",
    CHECKPOINT_FILE,
];

pub fn preset() -> RenumberConfig {
    RenumberConfig {
        files: DATA_FILES.iter().map(|f| f.to_string()).collect(),
        policy: CounterPolicy::Sequential { base: DEFAULT_BASE },
        checkpoint: Some(CheckpointConfig {
            file: CHECKPOINT_FILE.to_string(),
            target: CHECKPOINT_TARGET.to_string(),
            constant: CHECKPOINT_CONSTANT.to_string(),
        }),
    }
}

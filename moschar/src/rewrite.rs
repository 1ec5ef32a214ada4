//! The netlist bin rewriter: replaces the model reference of every matching
//! MOS instance with `<model>.<bin_id>`, selected from a [`BinTable`] by the
//! instance's width and length.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use arcstr::ArcStr;
use binspice::parser::{classify, InstanceLine, NetlistLine};

use crate::bins::BinTable;
use crate::error::{with_err_context, ErrorContext, ErrorSource, Result};
use crate::log::{debug, info};
use crate::units;

/// Rewrites netlists in terms of a base model name and a bin table.
///
/// Instances referencing `model` (or an already-binned `model.<id>`) are
/// rebinned from their `w`/`l` parameters; every other line is emitted
/// byte-for-byte.
pub struct BinRewriter {
    model: ArcStr,
    table: BinTable,
}

/// Counts of the operations performed by a rewrite pass.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RewriteSummary {
    /// Instances that were unbinned and received a bin.
    pub binned: usize,
    /// Instances whose recorded bin was wrong and was replaced.
    pub corrected: usize,
    /// Instances whose recorded bin was already correct.
    pub unchanged: usize,
}

impl RewriteSummary {
    pub fn total(&self) -> usize {
        self.binned + self.corrected + self.unchanged
    }
}

enum ModelRef<'a> {
    /// The bare base model.
    Unbinned,
    /// `base.<id>` with the recorded id.
    Binned(&'a str),
    /// Some other device model; not ours to touch.
    Foreign,
}

impl BinRewriter {
    pub fn new(model: impl Into<ArcStr>, table: BinTable) -> Self {
        Self {
            model: model.into(),
            table,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn table(&self) -> &BinTable {
        &self.table
    }

    fn model_ref<'a>(&self, token: &'a str) -> ModelRef<'a> {
        if token == self.model.as_str() {
            ModelRef::Unbinned
        } else if let Some(rest) = token.strip_prefix(self.model.as_str()) {
            match rest.strip_prefix('.') {
                Some(id) => ModelRef::Binned(id),
                None => ModelRef::Foreign,
            }
        } else {
            ModelRef::Foreign
        }
    }

    /// Rewrites a whole netlist, returning the new text and a summary.
    ///
    /// The transform is pure: nothing is written anywhere, and any error
    /// means no output at all rather than a partially rewritten netlist.
    /// Line endings and all non-instance bytes are preserved, so applying
    /// the rewrite twice yields the same text as applying it once.
    pub fn rewrite_str(&self, input: &str) -> Result<(String, RewriteSummary)> {
        let mut output = String::with_capacity(input.len());
        let mut summary = RewriteSummary::default();

        for segment in input.split_inclusive('\n') {
            let body_len = segment.trim_end_matches(['\r', '\n']).len();
            let (body, terminator) = segment.split_at(body_len);

            match classify(body).map_err(ErrorSource::from)? {
                NetlistLine::Instance(inst) => match self.model_ref(inst.model) {
                    ModelRef::Foreign => output.push_str(body),
                    ModelRef::Unbinned => {
                        let line = self.rebin(body, &inst, None, &mut summary)?;
                        output.push_str(&line);
                    }
                    ModelRef::Binned(existing) => {
                        let line = self.rebin(body, &inst, Some(existing), &mut summary)?;
                        output.push_str(&line);
                    }
                },
                _ => output.push_str(body),
            }
            output.push_str(terminator);
        }

        Ok((output, summary))
    }

    /// Rewrites the given netlist file in place.
    ///
    /// When `backup` is set, the original file is first copied to
    /// `<path>.<unix-seconds>`. The file is only rewritten after the whole
    /// transform succeeded.
    pub fn rewrite_file(&self, path: impl AsRef<Path>, backup: bool) -> Result<RewriteSummary> {
        let path = path.as_ref();
        let input = with_err_context(std::fs::read_to_string(path), || {
            ErrorContext::ReadFile(path.to_path_buf())
        })?;

        let (output, summary) = self.rewrite_str(&input)?;

        if backup {
            let secs = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0);
            let mut backup_path = path.as_os_str().to_os_string();
            backup_path.push(format!(".{secs}"));
            with_err_context(std::fs::copy(path, &backup_path), || {
                ErrorContext::Task(arcstr::format!("backing up {path:?}"))
            })?;
            info!("backed up {:?} to {:?}", path, backup_path);
        }

        with_err_context(std::fs::write(path, output), || {
            ErrorContext::WriteFile(path.to_path_buf())
        })?;

        info!(
            "rewrote {:?}: {} binned, {} corrected, {} already correct",
            path, summary.binned, summary.corrected, summary.unchanged
        );
        Ok(summary)
    }

    fn rebin(
        &self,
        line: &str,
        inst: &InstanceLine,
        existing: Option<&str>,
        summary: &mut RewriteSummary,
    ) -> Result<String> {
        let w = self.dimension(line, inst, "w")?;
        let l = self.dimension(line, inst, "l")?;

        let bin = self.table.select(w, l).ok_or_else(|| {
            ErrorSource::NoMatchingBin {
                instance: inst.name.to_string(),
                nodes: inst.nodes.join(" "),
                w,
                l,
            }
        })?;

        if existing == Some(bin.id.as_str()) {
            summary.unchanged += 1;
            debug!("instance {} already binned correctly ({})", inst.name, bin.id);
            return Ok(line.to_string());
        }

        let replacement = format!("{}.{}", self.model, bin.id);
        let mut out = String::with_capacity(line.len() + replacement.len());
        out.push_str(&line[..inst.model_offset]);
        out.push_str(&replacement);
        out.push_str(&line[inst.model_offset + inst.model.len()..]);

        match existing {
            Some(old) => {
                summary.corrected += 1;
                info!(
                    "corrected bin of instance {}: {}.{} -> {}",
                    inst.name, self.model, old, replacement
                );
            }
            None => {
                summary.binned += 1;
                info!("binned instance {}: {} -> {}", inst.name, self.model, replacement);
            }
        }

        Ok(out)
    }

    /// Extracts and validates one of the `w`/`l` parameters, in meters.
    fn dimension(&self, line: &str, inst: &InstanceLine, key: &str) -> Result<f64> {
        let malformed = |reason: String| ErrorSource::MalformedInstance {
            line: line.trim().to_string(),
            reason,
        };

        let raw = inst
            .param(key)
            .ok_or_else(|| malformed(format!("missing {key} parameter")))?;
        let value = units::parse_si(raw)
            .map_err(|e| malformed(format!("bad {key} value `{raw}`: {e}")))?;
        if value <= 0.0 {
            return Err(malformed(format!("{key} must be positive, got {raw}")).into());
        }
        Ok(value)
    }
}

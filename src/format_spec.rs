use std::fmt;

/// printf-style `%[-][width][.precision]s` spec applied to a directive's
/// text. Width and precision count characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSpec {
    pub left_align: bool,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

impl FormatSpec {
    pub fn is_plain(&self) -> bool {
        !self.left_align && self.width.is_none() && self.precision.is_none()
    }

    /// Append `value` to `out`, truncated to `precision` then padded to `width`.
    pub fn apply(&self, value: &str, out: &mut String) {
        if self.is_plain() {
            out.push_str(value);
            return;
        }

        let value = match self.precision {
            Some(precision) => match value.char_indices().nth(precision) {
                Some((cut, _)) => &value[..cut],
                None => value,
            },
            None => value,
        };

        let pad = self
            .width
            .map_or(0, |width| width.saturating_sub(value.chars().count()));

        if self.left_align {
            out.push_str(value);
            out.extend(std::iter::repeat(' ').take(pad));
        } else {
            out.extend(std::iter::repeat(' ').take(pad));
            out.push_str(value);
        }
    }
}

impl fmt::Display for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.left_align {
            f.write_str("-")?;
        }
        if let Some(width) = self.width {
            write!(f, "{}", width)?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{}", precision)?;
        }
        Ok(())
    }
}

//! Struct tables for atop 2.5 logs.
//!
//! 2.5 changed no on-disk layouts: header and record keep the 2.3 shape,
//! sstat and tstat keep the 2.4 shape. Only the version stamp differs.

use super::v2_3;
use super::v2_4;
use super::Layout;

pub(crate) fn layout() -> Layout {
    let v2_4 = v2_4::layout();
    Layout {
        major: 2,
        minor: 5,
        header: v2_3::header(),
        record: v2_3::record(),
        sstat: v2_4.sstat,
        tstat: v2_4.tstat,
    }
}

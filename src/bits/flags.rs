use bitflags::bitflags;

bitflags! {
    /// Per-object render state packed into one `u32`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RenderFlags: u32 {
        /// Object is drawn
        const VISIBLE = 1 << 0;
        /// Object is highlighted as selected
        const SELECTED = 1 << 1;
        /// Object casts shadows
        const CAST_SHADOW = 1 << 2;
        /// Object receives ambient occlusion
        const RECEIVES_AO = 1 << 3;
    }
}

impl RenderFlags {
    /// Check whether any bit of `flag` is set
    #[inline]
    pub fn has(self, flag: RenderFlags) -> bool {
        self.intersects(flag)
    }
}

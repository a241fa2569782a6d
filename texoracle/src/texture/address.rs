#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AddressMode {
    #[default]
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

/// Maps a possibly out-of-range integer texel coordinate into `[0, size)`.
pub fn resolve(mode: AddressMode, size: u32, raw: i64) -> i64 {
    let size = size as i64;
    match mode {
        AddressMode::ClampToEdge => raw.clamp(0, size - 1),
        AddressMode::Repeat => raw.rem_euclid(size),
        AddressMode::MirrorRepeat => {
            let inner = raw.rem_euclid(size);
            if raw.div_euclid(size) % 2 != 0 { size - inner - 1 } else { inner }
        }
    }
}

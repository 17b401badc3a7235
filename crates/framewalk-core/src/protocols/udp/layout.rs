pub const IPPROTO_UDP: u8 = 17;
pub const HEADER_LEN: usize = 8;

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "../etc/"]
pub struct Etc;

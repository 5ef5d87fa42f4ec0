use {
    crate::prompt::read_new_password,
    anyhow::ensure,
    ballot_wallet::{Keystore, generate_seed},
    clap::Subcommand,
    colored::Colorize,
    std::path::Path,
};

#[derive(Subcommand)]
pub enum KeysCmd {
    /// Generate a new ed25519 key and save it to an encrypted file
    Add,
    /// Display the address of the configured key
    Show,
}

impl KeysCmd {
    pub fn run(self, filename: &Path) -> anyhow::Result<()> {
        match self {
            KeysCmd::Add => add(filename),
            KeysCmd::Show => show(filename),
        }
    }
}

fn add(filename: &Path) -> anyhow::Result<()> {
    ensure!(!filename.exists(), "file `{filename:?}` already exists");

    let password =
        read_new_password(format!("🔑 Enter a password to encrypt file `{filename:?}`").bold())?;
    let keystore = Keystore::write_to_file(&generate_seed(), filename, password)?;

    println!("\n{} {}", "Address:".bold(), keystore.pubkey);
    println!(
        "\n{} there is no way to recover this key if you forget the password.",
        "Important:".bold()
    );
    println!("Fund it on devnet at {}", ballot_types::FAUCET_URL.underline());

    Ok(())
}

fn show(filename: &Path) -> anyhow::Result<()> {
    ensure!(filename.exists(), "file {filename:?} not found, create one with `ballot keys add`");

    let keystore = Keystore::read(filename)?;

    println!("{} {}", "Address:".bold(), keystore.pubkey);
    println!("{} {}", "File:".bold(), filename.display());

    Ok(())
}

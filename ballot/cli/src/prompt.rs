pub fn confirm<T>(prompt: T) -> dialoguer::Result<bool>
where
    T: ToString,
{
    dialoguer::Confirm::new()
        .with_prompt(prompt.to_string())
        .interact()
}

pub fn read_password<T>(prompt: T) -> dialoguer::Result<String>
where
    T: ToString,
{
    dialoguer::Password::new()
        .with_prompt(prompt.to_string())
        .interact()
}

/// Like [`read_password`], but asks twice.
pub fn read_new_password<T>(prompt: T) -> dialoguer::Result<String>
where
    T: ToString,
{
    dialoguer::Password::new()
        .with_prompt(prompt.to_string())
        .with_confirmation("🔑 Repeat the password", "Passwords don't match")
        .interact()
}

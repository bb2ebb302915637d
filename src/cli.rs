pub fn ask<'a, 'b>() -> clap::App<'a, 'b> {
    clap::App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .setting(clap::AppSettings::SubcommandRequiredElseHelp)
        .arg(
            clap::Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Makes Jobly verbose. Useful for debugging and seeing the SQL it runs")
        )
        .subcommand(
            clap::App::new("serve")
                .about("Start the jobs API")
                .arg(
                    clap::Arg::with_name("config")
                        .short("c")
                        .long("config")
                        .help("Path to .joblyrc file")
                        .default_value(".joblyrc")
                        .takes_value(true),
                )
                .arg(
                    clap::Arg::with_name("port")
                        .short("p")
                        .long("port")
                        .help("Custom server port, defaults to 8080")
                        .takes_value(true),
                )
                .arg(
                    clap::Arg::with_name("database")
                        .short("d")
                        .long("database")
                        .help("Database directory, defaults to ~/.jobly")
                        .takes_value(true),
                ),
        )
}

use console::style;

const BANNER: &str = r"
    _       ___ _     _    ___      _
   /_\   __| _ ) |___| |__/ __|___| |__
  / _ \ |_ / _ \ / _ \ '_ \ (_ / _ \ '_ \
 /_/ \_\/__|___/_\___/_.__/\___\___/_.__/
";

pub fn print_banner() {
    println!("{}", style(BANNER).blue());
    println!("{}", style(format!("\t\t\t\t\tv{}\n", env!("CARGO_PKG_VERSION"))).blue());
}

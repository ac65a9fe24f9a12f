fn main() {
    slint_build::compile("ui/shell.slint").expect("Failed to compile shell window UI");
}

//! Renders a [`fm::Netlist`]'s final partition into the output file format.

use std::fmt::Write as _;

use fm::{Netlist, Part};
use itertools::Itertools;

/// Builds the output text: cut size, then each part's cell names as a space-separated,
/// `;`-terminated list.
pub fn render(netlist: &Netlist, cut_size: usize) -> String {
    let mut out = String::new();
    writeln!(out, "Cutsize = {cut_size}").unwrap();

    write_group(&mut out, netlist, Part::A, "G1");
    write_group(&mut out, netlist, Part::B, "G2");

    out
}

fn write_group(out: &mut String, netlist: &Netlist, part: Part, label: &str) {
    let names = netlist
        .cells()
        .filter(|(_, cell)| cell.part() == part)
        .map(|(_, cell)| cell.name())
        .join(" ");
    writeln!(out, "{label} {}", netlist.part_size(part)).unwrap();
    writeln!(out, "{names} ;").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use fm::NetlistBuilder;

    #[test]
    fn renders_trivial_cut() {
        let mut b = NetlistBuilder::new();
        b.add_net("n1", &["c1", "c2"]).unwrap();
        b.add_net("n2", &["c1", "c2"]).unwrap();
        let netlist = b.finish();

        let rendered = render(&netlist, 0);
        assert_eq!(rendered, "Cutsize = 0\nG1 2\nc1 c2 ;\nG2 0\n ;\n");
    }
}

use crate::RrGraph;

impl RrGraph {
    pub fn print(&self, o: &mut dyn std::io::Write) -> std::io::Result<()> {
        for (id, name, kind) in &self.switches {
            writeln!(o, "\tSWITCH {id} {name:14} {kind:?}")?;
        }
        for (id, node) in self.nodes() {
            write!(
                o,
                "\tNODE {id} {kind:5} ({xl},{yl})-({xh},{yh}) PTC {ptc} CAP {cap}",
                kind = node.kind.to_string(),
                xl = node.xlow,
                yl = node.ylow,
                xh = node.xhigh,
                yh = node.yhigh,
                ptc = node.ptc,
                cap = node.capacity,
            )?;
            if let Some(metal) = node.metal {
                write!(o, " R {r} C {c}", r = metal.r_metal, c = metal.c_metal)?;
            }
            writeln!(o)?;
            for edge in &node.edges {
                writeln!(
                    o,
                    "\t\t-> {target} VIA {sw}",
                    target = edge.target,
                    sw = self.switches.key(edge.switch)
                )?;
            }
        }
        Ok(())
    }
}

use crate::{
    flds::{field::Field, Flds},
    prtls::ParticleContainer,
    Float, Output,
};
use anyhow::{Context, Result};
use log::info;

pub(crate) fn save_fld(fld: &Field, outdir: &str) -> Result<()> {
    for n in 0..fld.ncomp() {
        let name = if fld.ncomp() == 1 {
            fld.name.clone()
        } else {
            format!("{}_{}", fld.name, n)
        };
        npy::to_file(format!("{}/{}.npy", outdir, name), fld.valid_values(n))
            .context(format!("Could not save {} data to file", name))?;
    }
    Ok(())
}

fn save_attr<'a, I>(vals: I, stride: usize, path: String) -> Result<()>
where
    I: Iterator<Item = &'a Float>,
{
    let out: Vec<Float> = vals.step_by(stride).copied().collect();
    npy::to_file(&path, out).context(format!("Could not save {}", path))?;
    Ok(())
}

/// Dump every `stride`-th particle of each species and the valid region of
/// every field component, one npy file per quantity and level.
pub fn save_output(
    t: u32,
    output: &Output,
    flds: &[Flds],
    prtls: &[ParticleContainer],
) -> Result<()> {
    let output_prefix = format!("{}/dat_{:05}", output.outdir, t / output.output_interval);
    info!("saving output to {}", output_prefix);
    let stride = output.stride.max(1);
    for (lev, f) in flds.iter().enumerate() {
        let fld_dir = format!("{}/lev_{}/flds", output_prefix, lev);
        std::fs::create_dir_all(&fld_dir).context("Unable to create output directory")?;
        for fld in &[
            &f.e_x, &f.e_y, &f.e_z, &f.b_x, &f.b_y, &f.b_z, &f.j_x, &f.j_y, &f.j_z, &f.rho,
        ] {
            save_fld(fld, &fld_dir)?;
        }

        for p in prtls {
            let species = p.species();
            let prtl_dir = format!("{}/lev_{}/{}", output_prefix, lev, species.name);
            std::fs::create_dir_all(&prtl_dir).context("Unable to create output directory")?;
            let tiles = &species.tiles[lev];
            save_attr(tiles.iter().flat_map(|t| t.x.iter()), stride, format!("{}/x.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.y.iter()), stride, format!("{}/y.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.z.iter()), stride, format!("{}/z.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.ux.iter()), stride, format!("{}/ux.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.uy.iter()), stride, format!("{}/uy.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.uz.iter()), stride, format!("{}/uz.npy", prtl_dir))?;
            save_attr(tiles.iter().flat_map(|t| t.w.iter()), stride, format!("{}/w.npy", prtl_dir))?;
        }
    }
    Ok(())
}

/// Dense expression matrix: one row per gene, one column per patient,
/// row-major `f64` buffer. Shape is fixed once loaded; the normalization
/// stage overwrites raw values with z-scores in place.
#[derive(Debug, Clone)]
pub struct ExprMatrix {
    pub n_genes: usize,
    pub n_patients: usize,
    pub genes: Vec<String>,
    pub patients: Vec<String>,
    pub data: Vec<f64>,
}

impl ExprMatrix {
    pub fn new(genes: Vec<String>, patients: Vec<String>, data: Vec<f64>) -> Self {
        let n_genes = genes.len();
        let n_patients = patients.len();
        debug_assert_eq!(data.len(), n_genes * n_patients);
        ExprMatrix {
            n_genes,
            n_patients,
            genes,
            patients,
            data,
        }
    }

    #[inline]
    pub fn get(&self, gene: usize, patient: usize) -> f64 {
        self.data[gene * self.n_patients + patient]
    }

    #[inline]
    pub fn set(&mut self, gene: usize, patient: usize, value: f64) {
        self.data[gene * self.n_patients + patient] = value;
    }

    pub fn is_empty(&self) -> bool {
        self.n_genes == 0 || self.n_patients == 0
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/matrix.rs"]
mod tests;
